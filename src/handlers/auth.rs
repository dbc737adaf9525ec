use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDateTime, Utc};
use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::Identity;
use crate::auth::jwt::{Claims, generate_jwt};
use crate::auth::password::{hash_password, verify_password};
use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for registering a new user
#[derive(Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// At least 8 characters
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// One of `owner` (default), `tenant` or `staff`
    pub role: Option<String>,
}

/// Request body for logging in
#[derive(Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// User response model; never includes the password hash
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: model.role.to_string(),
            created_at: model.created_at,
        }
    }
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Roles that can be chosen at self registration.
fn registrable_role(role: Option<&str>) -> Result<Role, ApiError> {
    let Some(role) = role else {
        return Ok(Role::Owner);
    };

    match role.parse::<Role>() {
        Ok(Role::Admin) => Err(ApiError::BadRequest(
            "Admin accounts can not be self-registered".to_string(),
        )),
        Ok(role) => Ok(role),
        Err(e) => Err(ApiError::BadRequest(e)),
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering register function");
    let email = normalize_email(&request.email);
    let role = registrable_role(request.role.as_deref())?;
    debug!("Registering user with email: {}, role: {}", email, role);

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        warn!("Registration rejected, email {} already registered", email);
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(request.password, state.settings.bcrypt_cost).await?;
    let new_user = user::ActiveModel {
        email: Set(email.clone()),
        name: Set(request.name.map(|name| name.trim().to_string())),
        password_hash: Set(password_hash),
        role: Set(role),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!("User registered successfully with ID: {}, email: {}", user_model.id, user_model.email);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(UserResponse::from(user_model), "User registered successfully")),
            ))
        }
        Err(db_error) => {
            let message = db_error.to_string();
            if message.contains("UNIQUE") || message.contains("unique") {
                warn!("Registration rejected, email {} already registered", email);
                return Err(ApiError::Conflict("Email already registered".to_string()));
            }
            error!("Failed to register user '{}': {}", email, db_error);
            Err(db_error.into())
        }
    }
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    trace!("Entering login function");
    let email = normalize_email(&request.email);
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let Some(user_model) = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?
    else {
        warn!("Login failed, unknown email {}", email);
        return Err(invalid());
    };

    if !verify_password(request.password, user_model.password_hash.clone()).await? {
        warn!("Login failed, wrong password for user {}", user_model.id);
        return Err(invalid());
    }

    let expiry_hours = state.settings.jwt_expiry_hours;
    let token = generate_jwt(&Claims::new(&user_model, expiry_hours), &state.settings.jwt_secret)?;
    info!("User {} logged in", user_model.id);

    Ok(Json(ApiResponse::ok(
        LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: expiry_hours * 3600,
            user: UserResponse::from(user_model),
        },
        "Login successful",
    )))
}

/// The authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering me function");
    match user::Entity::find_by_id(identity.user_id).one(&state.db).await? {
        Some(user_model) => Ok(Json(ApiResponse::ok(
            UserResponse::from(user_model),
            "User retrieved successfully",
        ))),
        None => {
            warn!("User with ID {} from token not found", identity.user_id);
            Err(ApiError::NotFound("User not found".to_string()))
        }
    }
}
