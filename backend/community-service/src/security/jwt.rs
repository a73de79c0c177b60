/// JWT token generation and validation using HS256.
/// Tokens carry the user id as subject and a deliberately long expiry;
/// registration is the only place they are minted.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

// Thread-safe storage for the signing material loaded at startup.
lazy_static! {
    static ref JWT_KEYS: RwLock<Option<(EncodingKey, DecodingKey, i64)>> = RwLock::new(None);
}

/// Initialize signing keys from the configured secret.
/// Must be called during application startup before any JWT operations.
pub fn initialize_keys(secret: &str, token_ttl_days: i64) -> Result<()> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut keys = JWT_KEYS
        .write()
        .map_err(|e| AppError::Internal(format!("Failed to acquire write lock on JWT keys: {}", e)))?;
    *keys = Some((encoding_key, decoding_key, token_ttl_days));

    Ok(())
}

fn get_encoding_key() -> Result<(EncodingKey, i64)> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| AppError::Internal(format!("Failed to acquire read lock on JWT keys: {}", e)))?;

    keys.as_ref()
        .map(|(enc, _, ttl)| (enc.clone(), *ttl))
        .ok_or_else(|| {
            AppError::Internal(
                "JWT keys not initialized. Call initialize_keys() during startup".to_string(),
            )
        })
}

fn get_decoding_key() -> Result<DecodingKey> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| AppError::Internal(format!("Failed to acquire read lock on JWT keys: {}", e)))?;

    keys.as_ref().map(|(_, dec, _)| dec.clone()).ok_or_else(|| {
        AppError::Internal(
            "JWT keys not initialized. Call initialize_keys() during startup".to_string(),
        )
    })
}

/// Generate a signed token for a registered user.
pub fn generate_token(user_id: Uuid) -> Result<String> {
    let (encoding_key, ttl_days) = get_encoding_key()?;

    let now = Utc::now();
    let expiry = now + Duration::days(ttl_days);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
    };

    Ok(encode(
        &Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &encoding_key,
    )?)
}

/// Validate and decode a token
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;
    Ok(decode::<Claims>(
        token,
        &decoding_key,
        &Validation::new(jsonwebtoken::Algorithm::HS256),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_jwt_secret_value";
    const TEST_TTL_DAYS: i64 = 3650;

    fn init() {
        initialize_keys(TEST_SECRET, TEST_TTL_DAYS).unwrap();
    }

    #[test]
    fn test_generate_token() {
        init();
        let user_id = Uuid::new_v4();

        let token = generate_token(user_id).unwrap();
        assert!(!token.is_empty());
        // JWT tokens have 3 parts separated by dots
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_validate_valid_token() {
        init();
        let user_id = Uuid::new_v4();

        let token = generate_token(user_id).unwrap();
        let token_data = validate_token(&token).unwrap();

        assert_eq!(token_data.claims.sub, user_id.to_string());
        assert!(token_data.claims.iat > 0);
        assert!(token_data.claims.exp > token_data.claims.iat);
    }

    #[test]
    fn test_validate_invalid_token() {
        init();
        let result = validate_token("not.a.valid.token");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_corrupted_token() {
        init();
        let corrupted_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.corrupted.signature";
        let result = validate_token(corrupted_token);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        init();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
        };
        let forged = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();

        assert!(validate_token(&forged).is_err());
    }

    #[test]
    fn test_token_has_long_expiry() {
        init();
        let token = generate_token(Uuid::new_v4()).unwrap();

        let token_data = validate_token(&token).unwrap();
        let now = Utc::now().timestamp();
        let expected_expiry = now + TEST_TTL_DAYS * 24 * 3600;

        // Allow a few seconds tolerance for execution time
        assert!(token_data.claims.exp >= expected_expiry - 5);
        assert!(token_data.claims.exp <= expected_expiry + 5);
    }
}
