use crate::auth::jwt_auth_middleware;
use crate::handlers::{
    analysis::{compute_analysis, delete_analysis, get_analysis, get_analysis_report, save_analysis},
    auth::{login, me, register},
    health::health_check,
    leases::{create_lease, delete_lease, get_lease, get_leases, update_lease},
    properties::{create_property, delete_property, get_properties, get_property, update_property},
    tenants::{create_tenant, delete_tenant, get_tenant, get_tenants, update_tenant},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Routes that require a bearer token
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/me", get(me))
        // Property CRUD routes
        .route("/api/v1/properties", post(create_property).get(get_properties))
        .route(
            "/api/v1/properties/:property_id",
            get(get_property).put(update_property).delete(delete_property),
        )
        // Return analysis routes
        .route(
            "/api/v1/properties/:property_id/analysis",
            get(get_analysis).post(save_analysis).delete(delete_analysis),
        )
        .route("/api/v1/properties/:property_id/analysis/report", get(get_analysis_report))
        .route("/api/v1/analysis/compute", post(compute_analysis))
        // Tenant CRUD routes
        .route("/api/v1/tenants", post(create_tenant).get(get_tenants))
        .route(
            "/api/v1/tenants/:tenant_id",
            get(get_tenant).put(update_tenant).delete(delete_tenant),
        )
        // Lease CRUD routes
        .route("/api/v1/leases", post(create_lease).get(get_leases))
        .route(
            "/api/v1/leases/:lease_id",
            get(get_lease).put(update_lease).delete(delete_lease),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.settings.request_timeout_secs);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public auth routes
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .merge(protected_routes(&state))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
