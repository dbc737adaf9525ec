use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use common::{AnalysisMetrics, AnalysisRecordDto, AnalysisReport, ScenarioPayload, ScenarioSource};

use crate::config::Settings;
use crate::handlers::{
    auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
    leases::{CreateLeaseRequest, LeasePropertySummary, LeaseResponse, UpdateLeaseRequest},
    properties::{CreatePropertyRequest, PropertyResponse, UpdatePropertyRequest},
    tenants::{CreateTenantRequest, TenantResponse, UpdateTenantRequest},
};

pub use common::{ApiResponse, ErrorResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Runtime settings
    pub settings: Arc<Settings>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Registers the bearer token scheme referenced by the protected paths.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::me,
        crate::handlers::properties::create_property,
        crate::handlers::properties::get_properties,
        crate::handlers::properties::get_property,
        crate::handlers::properties::update_property,
        crate::handlers::properties::delete_property,
        crate::handlers::analysis::get_analysis,
        crate::handlers::analysis::save_analysis,
        crate::handlers::analysis::delete_analysis,
        crate::handlers::analysis::get_analysis_report,
        crate::handlers::analysis::compute_analysis,
        crate::handlers::tenants::create_tenant,
        crate::handlers::tenants::get_tenants,
        crate::handlers::tenants::get_tenant,
        crate::handlers::tenants::update_tenant,
        crate::handlers::tenants::delete_tenant,
        crate::handlers::leases::create_lease,
        crate::handlers::leases::get_leases,
        crate::handlers::leases::get_lease,
        crate::handlers::leases::update_lease,
        crate::handlers::leases::delete_lease,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<LoginResponse>,
            ApiResponse<PropertyResponse>,
            ApiResponse<Vec<PropertyResponse>>,
            ApiResponse<AnalysisRecordDto>,
            ApiResponse<AnalysisReport>,
            ApiResponse<TenantResponse>,
            ApiResponse<Vec<TenantResponse>>,
            ApiResponse<LeaseResponse>,
            ApiResponse<Vec<LeaseResponse>>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserResponse,
            CreatePropertyRequest,
            UpdatePropertyRequest,
            PropertyResponse,
            ScenarioPayload,
            AnalysisMetrics,
            AnalysisRecordDto,
            AnalysisReport,
            ScenarioSource,
            CreateTenantRequest,
            UpdateTenantRequest,
            TenantResponse,
            CreateLeaseRequest,
            UpdateLeaseRequest,
            LeaseResponse,
            LeasePropertySummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and the current user"),
        (name = "properties", description = "Rental properties of the signed-in owner"),
        (name = "analysis", description = "Return analysis of a property"),
        (name = "tenants", description = "Tenant records"),
        (name = "leases", description = "Leases between tenants and properties"),
    ),
    info(
        title = "Rentwise API",
        description = "Property rental management backend with return analysis",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
