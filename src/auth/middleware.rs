use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use model::entities::user::Role;
use tracing::{debug, warn};

use super::jwt::validate_jwt;
use crate::errors::ApiError;
use crate::schemas::AppState;

/// The authenticated caller, inserted into the request extensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

/// Rejects requests without a valid bearer token and attaches the caller's [`Identity`].
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).inspect_err(|e| {
        debug!("Rejecting unauthenticated request to {}: {}", request.uri().path(), e);
    })?;

    let claims = validate_jwt(token, &state.settings.jwt_secret).inspect_err(|e| {
        warn!("Rejecting request to {}: {}", request.uri().path(), e);
    })?;

    let identity = Identity {
        user_id: claims.user_id()?,
        email: claims.email.clone(),
        role: claims.role()?,
    };
    debug!(user_id = identity.user_id, role = %identity.role, "Authenticated request");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header format".to_string()))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err(ApiError::Unauthorized("Empty bearer token".to_string())),
        None => Err(ApiError::Unauthorized(
            "Authorization header must use Bearer token format".to_string(),
        )),
    }
}
