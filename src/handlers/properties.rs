use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDateTime, Utc};
use compute::DbScenarioStore;
use model::entities::property;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::{Identity, authorize_property, require_owner};
use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// US ZIP code, `12345` or `12345-6789`.
fn validate_zip(zip: &str) -> Result<(), ValidationError> {
    let bytes = zip.as_bytes();
    let digits = |part: &[u8]| part.iter().all(u8::is_ascii_digit);
    let valid = match bytes.len() {
        5 => digits(bytes),
        10 => digits(&bytes[..5]) && bytes[5] == b'-' && digits(&bytes[6..]),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("zip").with_message("Invalid ZIP code".into()))
    }
}

/// Request body for creating a new property
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub unit: Option<String>,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(custom(function = "validate_zip"))]
    pub zip: String,
    /// Asking monthly rent
    #[schema(value_type = String, example = "1850.00")]
    pub rent: Decimal,
    pub image_url: Option<String>,
    pub sqft: Option<i32>,
    pub bedrooms: Option<i32>,
    pub full_baths: Option<i32>,
    pub three_quarter_baths: Option<i32>,
    pub half_baths: Option<i32>,
    pub quarter_baths: Option<i32>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub renovations: Vec<String>,
    #[schema(value_type = Option<String>)]
    pub home_value: Option<Decimal>,
    #[serde(default)]
    pub use_zestimate: bool,
}

/// Request body for updating a property; only provided fields change
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 1, message = "Address can not be empty"))]
    pub address: Option<String>,
    pub unit: Option<String>,
    #[validate(length(min = 1, message = "City can not be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 1, message = "State can not be empty"))]
    pub state: Option<String>,
    #[validate(custom(function = "validate_zip"))]
    pub zip: Option<String>,
    #[schema(value_type = Option<String>)]
    pub rent: Option<Decimal>,
    pub image_url: Option<String>,
    pub sqft: Option<i32>,
    pub bedrooms: Option<i32>,
    pub full_baths: Option<i32>,
    pub three_quarter_baths: Option<i32>,
    pub half_baths: Option<i32>,
    pub quarter_baths: Option<i32>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    pub features: Option<Vec<String>>,
    pub renovations: Option<Vec<String>>,
    #[schema(value_type = Option<String>)]
    pub home_value: Option<Decimal>,
    pub use_zestimate: Option<bool>,
}

/// Property response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: i32,
    pub owner_id: i32,
    pub address: String,
    pub unit: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[schema(value_type = String)]
    pub rent: Decimal,
    pub image_url: Option<String>,
    pub sqft: Option<i32>,
    pub bedrooms: Option<i32>,
    pub full_baths: Option<i32>,
    pub three_quarter_baths: Option<i32>,
    pub half_baths: Option<i32>,
    pub quarter_baths: Option<i32>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    pub features: Vec<String>,
    pub renovations: Vec<String>,
    #[schema(value_type = Option<String>)]
    pub home_value: Option<Decimal>,
    pub use_zestimate: bool,
    pub created_at: NaiveDateTime,
}

impl From<property::Model> for PropertyResponse {
    fn from(model: property::Model) -> Self {
        Self {
            features: decode_list(model.features.as_deref()),
            renovations: decode_list(model.renovations.as_deref()),
            id: model.id,
            owner_id: model.owner_id,
            address: model.address,
            unit: model.unit,
            city: model.city,
            state: model.state,
            zip: model.zip,
            rent: model.rent,
            image_url: model.image_url,
            sqft: model.sqft,
            bedrooms: model.bedrooms,
            full_baths: model.full_baths,
            three_quarter_baths: model.three_quarter_baths,
            half_baths: model.half_baths,
            quarter_baths: model.quarter_baths,
            year_built: model.year_built,
            property_type: model.property_type,
            home_value: model.home_value,
            use_zestimate: model.use_zestimate,
            created_at: model.created_at,
        }
    }
}

fn encode_list(items: &[String]) -> Option<String> {
    serde_json::to_string(items).ok()
}

fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}

/// Create a new property owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = "properties",
    security(("bearer_auth" = [])),
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property created successfully", body = ApiResponse<PropertyResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is not an owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_property(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Valid(Json(request)): Valid<Json<CreatePropertyRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PropertyResponse>>), ApiError> {
    trace!("Entering create_property function");
    require_owner(&identity)?;
    debug!("Creating property at {}, {} for owner {}", request.address, request.city, identity.user_id);

    let new_property = property::ActiveModel {
        owner_id: Set(identity.user_id),
        address: Set(request.address.trim().to_string()),
        unit: Set(request.unit),
        city: Set(request.city.trim().to_string()),
        state: Set(request.state.trim().to_string()),
        zip: Set(request.zip),
        rent: Set(request.rent),
        image_url: Set(request.image_url),
        sqft: Set(request.sqft),
        bedrooms: Set(request.bedrooms),
        full_baths: Set(request.full_baths),
        three_quarter_baths: Set(request.three_quarter_baths),
        half_baths: Set(request.half_baths),
        quarter_baths: Set(request.quarter_baths),
        year_built: Set(request.year_built),
        property_type: Set(request.property_type),
        features: Set(encode_list(&request.features)),
        renovations: Set(encode_list(&request.renovations)),
        home_value: Set(request.home_value),
        use_zestimate: Set(request.use_zestimate),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    match new_property.insert(&state.db).await {
        Ok(property_model) => {
            info!("Property created successfully with ID: {}", property_model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    PropertyResponse::from(property_model),
                    "Property created successfully",
                )),
            ))
        }
        Err(db_error) => {
            error!("Failed to create property for owner {}: {}", identity.user_id, db_error);
            Err(db_error.into())
        }
    }
}

/// List the caller's properties
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = "properties",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Properties retrieved successfully", body = ApiResponse<Vec<PropertyResponse>>),
        (status = 403, description = "Caller is not an owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_properties(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<Vec<PropertyResponse>>>, ApiError> {
    trace!("Entering get_properties function");
    require_owner(&identity)?;

    let properties = property::Entity::find()
        .filter(property::Column::OwnerId.eq(identity.user_id))
        .order_by_asc(property::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} properties", properties.len());
    Ok(Json(ApiResponse::ok(
        properties.into_iter().map(PropertyResponse::from).collect(),
        "Properties retrieved successfully",
    )))
}

/// Get a specific property by ID
#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}",
    tag = "properties",
    security(("bearer_auth" = [])),
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Property retrieved successfully", body = ApiResponse<PropertyResponse>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_property(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<PropertyResponse>>, ApiError> {
    trace!("Entering get_property function for property_id: {}", property_id);
    let property_model = authorize_property(&state.db, &identity, property_id).await?;

    info!("Successfully retrieved property with ID: {}", property_model.id);
    Ok(Json(ApiResponse::ok(
        PropertyResponse::from(property_model),
        "Property retrieved successfully",
    )))
}

/// Update a property
#[utoipa::path(
    put,
    path = "/api/v1/properties/{property_id}",
    tag = "properties",
    security(("bearer_auth" = [])),
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Property updated successfully", body = ApiResponse<PropertyResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_property(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Valid(Json(request)): Valid<Json<UpdatePropertyRequest>>,
) -> Result<Json<ApiResponse<PropertyResponse>>, ApiError> {
    trace!("Entering update_property function for property_id: {}", property_id);
    let existing = authorize_property(&state.db, &identity, property_id).await?;

    let mut active: property::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    macro_rules! set_if_present {
        ($field:ident) => {
            if let Some(value) = request.$field {
                active.$field = Set(value);
                updated_fields.push(stringify!($field));
            }
        };
        ($field:ident, optional) => {
            if let Some(value) = request.$field {
                active.$field = Set(Some(value));
                updated_fields.push(stringify!($field));
            }
        };
    }

    set_if_present!(address);
    set_if_present!(unit, optional);
    set_if_present!(city);
    set_if_present!(state);
    set_if_present!(zip);
    set_if_present!(rent);
    set_if_present!(image_url, optional);
    set_if_present!(sqft, optional);
    set_if_present!(bedrooms, optional);
    set_if_present!(full_baths, optional);
    set_if_present!(three_quarter_baths, optional);
    set_if_present!(half_baths, optional);
    set_if_present!(quarter_baths, optional);
    set_if_present!(year_built, optional);
    set_if_present!(property_type, optional);
    set_if_present!(home_value, optional);
    set_if_present!(use_zestimate);
    if let Some(features) = request.features {
        active.features = Set(encode_list(&features));
        updated_fields.push("features");
    }
    if let Some(renovations) = request.renovations {
        active.renovations = Set(encode_list(&renovations));
        updated_fields.push("renovations");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for property ID: {}", property_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Property with ID {} updated successfully", property_id);
            Ok(Json(ApiResponse::ok(
                PropertyResponse::from(updated),
                "Property updated successfully",
            )))
        }
        Err(db_error) => {
            error!("Failed to update property with ID {}: {}", property_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Delete a property together with its analysis and leases
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{property_id}",
    tag = "properties",
    security(("bearer_auth" = [])),
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Property deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_property(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_property function for property_id: {}", property_id);
    authorize_property(&state.db, &identity, property_id).await?;

    let txn = state.db.begin().await?;
    let removed = DbScenarioStore::delete_with(&txn, property_id).await?;
    debug!("Removed {} analyses of property {}", removed, property_id);

    let result = property::Entity::delete_by_id(property_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        warn!("Property with ID {} disappeared before delete", property_id);
        txn.rollback().await?;
        return Err(ApiError::NotFound("Property not found".to_string()));
    }
    txn.commit().await?;

    info!("Property with ID {} deleted successfully", property_id);
    Ok(Json(ApiResponse::ok(
        format!("Property {} deleted", property_id),
        "Property deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_zip() {
        assert!(validate_zip("83702").is_ok());
        assert!(validate_zip("83702-1234").is_ok());
        assert!(validate_zip("8370").is_err());
        assert!(validate_zip("83702_1234").is_err());
        assert!(validate_zip("abcde").is_err());
    }

    #[test]
    fn test_feature_lists_round_trip() {
        let encoded = encode_list(&["Pool".to_string(), "Garage".to_string()]);
        assert_eq!(decode_list(encoded.as_deref()), vec!["Pool", "Garage"]);
        assert!(decode_list(None).is_empty());
        assert!(decode_list(Some("not json")).is_empty());
    }
}
