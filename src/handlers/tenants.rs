use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDateTime, Utc};
use model::entities::tenant;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::Identity;
use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new tenant
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Request body for updating a tenant
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    #[validate(length(min = 1, max = 200, message = "Name can not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Tenant response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<tenant::Model> for TenantResponse {
    fn from(model: tenant::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            created_at: model.created_at,
        }
    }
}

async fn find_tenant(state: &AppState, tenant_id: i32) -> Result<tenant::Model, ApiError> {
    tenant::Entity::find_by_id(tenant_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Tenant with ID {} not found", tenant_id);
            ApiError::NotFound("Tenant not found".to_string())
        })
}

/// Create a new tenant
#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    tag = "tenants",
    security(("bearer_auth" = [])),
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created successfully", body = ApiResponse<TenantResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_tenant(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Valid(Json(request)): Valid<Json<CreateTenantRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TenantResponse>>), ApiError> {
    trace!("Entering create_tenant function");
    debug!("User {} creating tenant '{}'", identity.user_id, request.name);

    let new_tenant = tenant::ActiveModel {
        name: Set(request.name.trim().to_string()),
        email: Set(request.email),
        phone: Set(request.phone),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    match new_tenant.insert(&state.db).await {
        Ok(tenant_model) => {
            info!("Tenant created successfully with ID: {}", tenant_model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(TenantResponse::from(tenant_model), "Tenant created successfully")),
            ))
        }
        Err(db_error) => {
            error!("Failed to create tenant: {}", db_error);
            Err(db_error.into())
        }
    }
}

/// List all tenants
#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    tag = "tenants",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tenants retrieved successfully", body = ApiResponse<Vec<TenantResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_tenants(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TenantResponse>>>, ApiError> {
    trace!("Entering get_tenants function");
    let tenants = tenant::Entity::find()
        .order_by_asc(tenant::Column::Name)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} tenants", tenants.len());
    Ok(Json(ApiResponse::ok(
        tenants.into_iter().map(TenantResponse::from).collect(),
        "Tenants retrieved successfully",
    )))
}

/// Get a specific tenant by ID
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{tenant_id}",
    tag = "tenants",
    security(("bearer_auth" = [])),
    params(
        ("tenant_id" = i32, Path, description = "Tenant ID"),
    ),
    responses(
        (status = 200, description = "Tenant retrieved successfully", body = ApiResponse<TenantResponse>),
        (status = 404, description = "Tenant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_tenant(
    Path(tenant_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TenantResponse>>, ApiError> {
    trace!("Entering get_tenant function for tenant_id: {}", tenant_id);
    let tenant_model = find_tenant(&state, tenant_id).await?;

    info!("Successfully retrieved tenant with ID: {}", tenant_id);
    Ok(Json(ApiResponse::ok(
        TenantResponse::from(tenant_model),
        "Tenant retrieved successfully",
    )))
}

/// Update a tenant
#[utoipa::path(
    put,
    path = "/api/v1/tenants/{tenant_id}",
    tag = "tenants",
    security(("bearer_auth" = [])),
    params(
        ("tenant_id" = i32, Path, description = "Tenant ID"),
    ),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Tenant updated successfully", body = ApiResponse<TenantResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_tenant(
    Path(tenant_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTenantRequest>>,
) -> Result<Json<ApiResponse<TenantResponse>>, ApiError> {
    trace!("Entering update_tenant function for tenant_id: {}", tenant_id);
    let mut active: tenant::ActiveModel = find_tenant(&state, tenant_id).await?.into();

    if let Some(name) = request.name {
        debug!("Updating tenant name to: {}", name);
        active.name = Set(name.trim().to_string());
    }
    if let Some(email) = request.email {
        active.email = Set(Some(email));
    }
    if let Some(phone) = request.phone {
        active.phone = Set(Some(phone));
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Tenant with ID {} updated successfully", tenant_id);
            Ok(Json(ApiResponse::ok(TenantResponse::from(updated), "Tenant updated successfully")))
        }
        Err(db_error) => {
            error!("Failed to update tenant with ID {}: {}", tenant_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Delete a tenant and their leases
#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{tenant_id}",
    tag = "tenants",
    security(("bearer_auth" = [])),
    params(
        ("tenant_id" = i32, Path, description = "Tenant ID"),
    ),
    responses(
        (status = 200, description = "Tenant deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Tenant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_tenant(
    Path(tenant_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_tenant function for tenant_id: {}", tenant_id);
    let result = tenant::Entity::delete_by_id(tenant_id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        warn!("Tenant with ID {} not found for deletion", tenant_id);
        return Err(ApiError::NotFound("Tenant not found".to_string()));
    }

    info!("Tenant with ID {} deleted successfully", tenant_id);
    Ok(Json(ApiResponse::ok(
        format!("Tenant {} deleted", tenant_id),
        "Tenant deleted successfully",
    )))
}
