use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use model::entities::user::{self, Role};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &user::Model, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.to_string(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<i32, ApiError> {
        self.sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))
    }

    pub fn role(&self) -> Result<Role, ApiError> {
        self.role
            .parse()
            .map_err(|_| ApiError::Unauthorized("Invalid token role".to_string()))
    }
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, ApiError> {
    if secret.is_empty() {
        return Err(ApiError::Internal("JWT secret not configured".to_string()));
    }

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| ApiError::Internal(format!("JWT generation error: {}", e)))
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> user::Model {
        user::Model {
            id: 7,
            email: "owner@example.com".to_string(),
            name: None,
            password_hash: String::new(),
            role: Role::Owner,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let claims = Claims::new(&owner(), 1);
        let token = generate_jwt(&claims, "secret").unwrap();
        let decoded = validate_jwt(&token, "secret").unwrap();

        assert_eq!(decoded, claims);
        assert_eq!(decoded.user_id().unwrap(), 7);
        assert_eq!(decoded.role().unwrap(), Role::Owner);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_jwt(&Claims::new(&owner(), 1), "secret").unwrap();
        assert!(matches!(validate_jwt(&token, "other"), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = generate_jwt(&Claims::new(&owner(), -2), "secret").unwrap();
        assert!(matches!(validate_jwt(&token, "secret"), Err(ApiError::Unauthorized(_))));
    }
}
