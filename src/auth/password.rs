use crate::errors::ApiError;

/// Hashes a password off the async runtime.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Checks a password against a stored bcrypt hash. A malformed hash never matches.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::TEST_BCRYPT_COST;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse".to_string(), TEST_BCRYPT_COST)
            .await
            .unwrap();

        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_match() {
        assert!(!verify_password("pw".to_string(), "not-a-hash".to_string()).await.unwrap());
    }
}
