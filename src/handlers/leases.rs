use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use model::entities::{lease, property, tenant, user::Role};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::{Identity, authorize_property};
use crate::errors::ApiError;
use crate::handlers::tenants::TenantResponse;
use crate::schemas::{ApiResponse, AppState};

fn validate_non_negative(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new("non_negative").with_message("Amount can not be negative".into()));
    }
    Ok(())
}

fn check_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), ValidationError> {
    if end_date < start_date {
        return Err(ValidationError::new("lease_dates")
            .with_message("End date must not be before start date".into()));
    }
    Ok(())
}

fn validate_lease_dates(request: &CreateLeaseRequest) -> Result<(), ValidationError> {
    check_dates(request.start_date, request.end_date)
}

/// Request body for creating a new lease
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_lease_dates"))]
pub struct CreateLeaseRequest {
    pub property_id: i32,
    pub tenant_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = String, example = "1850.00")]
    #[validate(custom(function = "validate_non_negative"))]
    pub monthly_rent: Decimal,
    #[schema(value_type = String, example = "1850.00")]
    #[validate(custom(function = "validate_non_negative"))]
    pub security_deposit: Decimal,
}

/// Request body for updating a lease
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaseRequest {
    pub property_id: Option<i32>,
    pub tenant_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_non_negative"))]
    pub monthly_rent: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_non_negative"))]
    pub security_deposit: Option<Decimal>,
}

/// The leased property, as shown on a lease
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeasePropertySummary {
    pub id: i32,
    pub address: String,
    pub unit: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl From<property::Model> for LeasePropertySummary {
    fn from(model: property::Model) -> Self {
        Self {
            id: model.id,
            address: model.address,
            unit: model.unit,
            city: model.city,
            state: model.state,
            zip: model.zip,
        }
    }
}

/// Lease response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaseResponse {
    pub id: i32,
    pub property_id: i32,
    pub tenant_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = String)]
    pub monthly_rent: Decimal,
    #[schema(value_type = String)]
    pub security_deposit: Decimal,
    pub created_at: NaiveDateTime,
    pub tenant: Option<TenantResponse>,
    pub property: Option<LeasePropertySummary>,
}

impl LeaseResponse {
    fn new(
        model: lease::Model,
        tenant: Option<tenant::Model>,
        property: Option<property::Model>,
    ) -> Self {
        Self {
            id: model.id,
            property_id: model.property_id,
            tenant_id: model.tenant_id,
            start_date: model.start_date,
            end_date: model.end_date,
            monthly_rent: model.monthly_rent,
            security_deposit: model.security_deposit,
            created_at: model.created_at,
            tenant: tenant.map(TenantResponse::from),
            property: property.map(LeasePropertySummary::from),
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

/// Loads a lease together with its property, checking the caller may access it.
async fn authorize_lease(
    state: &AppState,
    identity: &Identity,
    lease_id: i32,
) -> Result<(lease::Model, property::Model), ApiError> {
    let lease_model = lease::Entity::find_by_id(lease_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Lease with ID {} not found", lease_id);
            ApiError::NotFound("Lease not found".to_string())
        })?;

    let property_model = authorize_property(&state.db, identity, lease_model.property_id).await?;
    Ok((lease_model, property_model))
}

/// Create a new lease
#[utoipa::path(
    post,
    path = "/api/v1/leases",
    tag = "leases",
    security(("bearer_auth" = [])),
    request_body = CreateLeaseRequest,
    responses(
        (status = 201, description = "Lease created successfully", body = ApiResponse<LeaseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property or tenant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_lease(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Valid(Json(request)): Valid<Json<CreateLeaseRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LeaseResponse>>), ApiError> {
    trace!("Entering create_lease function");
    let property_model = authorize_property(&state.db, &identity, request.property_id).await?;
    let tenant_model = find_tenant(&state, request.tenant_id).await?;
    debug!(
        "Creating lease of property {} for tenant {} from {} to {}",
        request.property_id, request.tenant_id, request.start_date, request.end_date
    );

    let new_lease = lease::ActiveModel {
        property_id: Set(request.property_id),
        tenant_id: Set(request.tenant_id),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        monthly_rent: Set(request.monthly_rent),
        security_deposit: Set(request.security_deposit),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    match new_lease.insert(&state.db).await {
        Ok(lease_model) => {
            info!("Lease created successfully with ID: {}", lease_model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    LeaseResponse::new(lease_model, Some(tenant_model), Some(property_model)),
                    "Lease created successfully",
                )),
            ))
        }
        Err(db_error) => {
            error!("Failed to create lease: {}", db_error);
            Err(db_error.into())
        }
    }
}

/// List the leases on the caller's properties
#[utoipa::path(
    get,
    path = "/api/v1/leases",
    tag = "leases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Leases retrieved successfully", body = ApiResponse<Vec<LeaseResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leases(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<Vec<LeaseResponse>>>, ApiError> {
    trace!("Entering get_leases function");
    if identity.role != Role::Owner {
        debug!("User {} holds no properties, returning no leases", identity.user_id);
        return Ok(Json(ApiResponse::ok(Vec::new(), "Leases retrieved successfully")));
    }

    let properties: HashMap<i32, property::Model> = property::Entity::find()
        .filter(property::Column::OwnerId.eq(identity.user_id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let leases = lease::Entity::find()
        .filter(lease::Column::PropertyId.is_in(properties.keys().copied().collect::<Vec<_>>()))
        .order_by_asc(lease::Column::StartDate)
        .find_also_related(tenant::Entity)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} leases", leases.len());
    let responses = leases
        .into_iter()
        .map(|(lease_model, tenant_model)| {
            let property_model = properties.get(&lease_model.property_id).cloned();
            LeaseResponse::new(lease_model, tenant_model, property_model)
        })
        .collect();

    Ok(Json(ApiResponse::ok(responses, "Leases retrieved successfully")))
}

/// Get a specific lease by ID
#[utoipa::path(
    get,
    path = "/api/v1/leases/{lease_id}",
    tag = "leases",
    security(("bearer_auth" = [])),
    params(
        ("lease_id" = i32, Path, description = "Lease ID"),
    ),
    responses(
        (status = 200, description = "Lease retrieved successfully", body = ApiResponse<LeaseResponse>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Lease not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_lease(
    Path(lease_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<LeaseResponse>>, ApiError> {
    trace!("Entering get_lease function for lease_id: {}", lease_id);
    let (lease_model, property_model) = authorize_lease(&state, &identity, lease_id).await?;
    let tenant_model = tenant::Entity::find_by_id(lease_model.tenant_id).one(&state.db).await?;

    info!("Successfully retrieved lease with ID: {}", lease_id);
    Ok(Json(ApiResponse::ok(
        LeaseResponse::new(lease_model, tenant_model, Some(property_model)),
        "Lease retrieved successfully",
    )))
}

/// Update a lease
#[utoipa::path(
    put,
    path = "/api/v1/leases/{lease_id}",
    tag = "leases",
    security(("bearer_auth" = [])),
    params(
        ("lease_id" = i32, Path, description = "Lease ID"),
    ),
    request_body = UpdateLeaseRequest,
    responses(
        (status = 200, description = "Lease updated successfully", body = ApiResponse<LeaseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Lease, property or tenant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_lease(
    Path(lease_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Valid(Json(request)): Valid<Json<UpdateLeaseRequest>>,
) -> Result<Json<ApiResponse<LeaseResponse>>, ApiError> {
    trace!("Entering update_lease function for lease_id: {}", lease_id);
    let (existing, mut property_model) = authorize_lease(&state, &identity, lease_id).await?;

    let start_date = request.start_date.unwrap_or(existing.start_date);
    let end_date = request.end_date.unwrap_or(existing.end_date);
    check_dates(start_date, end_date)
        .map_err(|_| ApiError::BadRequest("End date must not be before start date".to_string()))?;

    let mut active: lease::ActiveModel = existing.clone().into();

    if let Some(property_id) = request.property_id.filter(|id| *id != existing.property_id) {
        debug!("Moving lease {} to property {}", lease_id, property_id);
        property_model = authorize_property(&state.db, &identity, property_id).await?;
        active.property_id = Set(property_id);
    }
    let tenant_id = request.tenant_id.unwrap_or(existing.tenant_id);
    let tenant_model = find_tenant(&state, tenant_id).await?;
    active.tenant_id = Set(tenant_id);
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    if let Some(monthly_rent) = request.monthly_rent {
        active.monthly_rent = Set(monthly_rent);
    }
    if let Some(security_deposit) = request.security_deposit {
        active.security_deposit = Set(security_deposit);
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Lease with ID {} updated successfully", lease_id);
            Ok(Json(ApiResponse::ok(
                LeaseResponse::new(updated, Some(tenant_model), Some(property_model)),
                "Lease updated successfully",
            )))
        }
        Err(db_error) => {
            error!("Failed to update lease with ID {}: {}", lease_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Delete a lease
#[utoipa::path(
    delete,
    path = "/api/v1/leases/{lease_id}",
    tag = "leases",
    security(("bearer_auth" = [])),
    params(
        ("lease_id" = i32, Path, description = "Lease ID"),
    ),
    responses(
        (status = 200, description = "Lease deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Lease not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_lease(
    Path(lease_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_lease function for lease_id: {}", lease_id);
    authorize_lease(&state, &identity, lease_id).await?;

    lease::Entity::delete_by_id(lease_id).exec(&state.db).await?;
    info!("Lease with ID {} deleted successfully", lease_id);
    Ok(Json(ApiResponse::ok(
        format!("Lease {} deleted", lease_id),
        "Lease deleted successfully",
    )))
}
