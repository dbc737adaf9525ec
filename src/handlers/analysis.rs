use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use common::{AnalysisRecordDto, AnalysisReport, ScenarioSource};
use compute::{DbScenarioStore, Scenario, ScenarioStore, analyze, compute_metrics, normalize};
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

use crate::auth::{Identity, authorize_property};
use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState};

fn store(state: &AppState) -> DbScenarioStore {
    DbScenarioStore::new(state.db.clone())
}

/// Get the stored analysis of a property
#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}/analysis",
    tag = "analysis",
    security(("bearer_auth" = [])),
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Analysis retrieved successfully", body = ApiResponse<AnalysisRecordDto>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property or analysis not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_analysis(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<AnalysisRecordDto>>, ApiError> {
    trace!("Entering get_analysis function for property_id: {}", property_id);
    authorize_property(&state.db, &identity, property_id).await?;

    match store(&state).load(property_id).await? {
        Some(record) => {
            info!("Retrieved analysis {} of property {}", record.id, property_id);
            Ok(Json(ApiResponse::ok(record.to_dto(), "Analysis retrieved successfully")))
        }
        None => {
            warn!("No analysis saved for property {}", property_id);
            Err(ApiError::NotFound("No analysis found for this property".to_string()))
        }
    }
}

/// Save the analysis of a property, replacing any earlier one
///
/// The body is read leniently: missing or unparseable numbers count as zero
/// and line items may come as label/value arrays or as `{label, value}` pairs.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{property_id}/analysis",
    tag = "analysis",
    security(("bearer_auth" = [])),
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    request_body = ScenarioPayload,
    responses(
        (status = 200, description = "Analysis saved successfully", body = ApiResponse<AnalysisRecordDto>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn save_analysis(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<AnalysisRecordDto>>, ApiError> {
    trace!("Entering save_analysis function for property_id: {}", property_id);
    authorize_property(&state.db, &identity, property_id).await?;

    let scenario = normalize(&body);
    debug!(
        "Saving scenario '{}' with {} income and {} cash line items",
        scenario.scenario_name,
        scenario.misc_incomes.len(),
        scenario.cash_misc.len()
    );

    let record = store(&state).save(property_id, &scenario).await?;
    info!("Analysis {} of property {} saved", record.id, property_id);
    Ok(Json(ApiResponse::ok(record.to_dto(), "Analysis saved successfully")))
}

/// Delete the stored analysis of a property
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{property_id}/analysis",
    tag = "analysis",
    security(("bearer_auth" = [])),
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Analysis deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property or analysis not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_analysis(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_analysis function for property_id: {}", property_id);
    authorize_property(&state.db, &identity, property_id).await?;

    if store(&state).delete(property_id).await? == 0 {
        warn!("No analysis to delete for property {}", property_id);
        return Err(ApiError::NotFound("No analysis found for this property".to_string()));
    }

    info!("Analysis of property {} deleted", property_id);
    Ok(Json(ApiResponse::ok(
        format!("Analysis of property {} deleted", property_id),
        "Analysis deleted successfully",
    )))
}

/// Scenario and metrics of a property
///
/// Uses the saved analysis, or defaults seeded from the property's rent when
/// nothing has been saved yet.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}/analysis/report",
    tag = "analysis",
    security(("bearer_auth" = [])),
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Report computed successfully", body = ApiResponse<AnalysisReport>),
        (status = 403, description = "Not the caller's property", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_analysis_report(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<AnalysisReport>>, ApiError> {
    trace!("Entering get_analysis_report function for property_id: {}", property_id);
    let property = authorize_property(&state.db, &identity, property_id).await?;

    let (scenario, source) = match store(&state).load(property_id).await? {
        Some(record) => (record.scenario, ScenarioSource::Saved),
        None => {
            debug!("Property {} has no saved analysis, seeding from rent {}", property_id, property.rent);
            (Scenario::seeded(property.rent), ScenarioSource::Defaults)
        }
    };

    let metrics = compute_metrics(&scenario);
    info!(
        "Report for property {} ({:?}): cash flow {}, cash on cash {}",
        property_id, source, metrics.cash_flow, metrics.cash_on_cash
    );

    Ok(Json(ApiResponse::ok(
        AnalysisReport {
            property_id: Some(property_id),
            source,
            scenario: scenario.to_payload(),
            metrics,
        },
        "Report computed successfully",
    )))
}

/// Run the analysis on a scenario without storing it
#[utoipa::path(
    post,
    path = "/api/v1/analysis/compute",
    tag = "analysis",
    security(("bearer_auth" = [])),
    request_body = ScenarioPayload,
    responses(
        (status = 200, description = "Metrics computed successfully", body = ApiResponse<AnalysisReport>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[instrument(skip(body))]
pub async fn compute_analysis(
    Extension(identity): Extension<Identity>,
    Json(body): Json<Value>,
) -> Json<ApiResponse<AnalysisReport>> {
    trace!("Entering compute_analysis function");
    let (scenario, metrics) = analyze(&body);
    debug!(user_id = identity.user_id, "Computed metrics for submitted scenario");

    Json(ApiResponse::ok(
        AnalysisReport {
            property_id: None,
            source: ScenarioSource::Submitted,
            scenario: scenario.to_payload(),
            metrics,
        },
        "Metrics computed successfully",
    ))
}
