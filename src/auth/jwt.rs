use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::ApiError;

/// Session token service. The signing key is process-wide configuration,
/// injected once at construction and never rotated at runtime.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expires_in: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("token_expires_in", &self.token_expires_in)
            .finish()
    }
}

impl JwtService {
    /// Create a new token service with the given secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expires_in: Duration::hours(24),
        }
    }

    /// Create a session token bound to a user identity
    pub fn create_token(&self, user_id: Uuid) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + self.token_expires_in;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| ApiError::Internal(err.into()))
    }

    /// Validate signature and expiry, then decode the claims. No database
    /// round trip happens here; identity existence is re-checked by the
    /// caller on every use.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| ApiError::InvalidToken)
    }

    /// Token lifetime in seconds
    pub fn token_expires_in_seconds(&self) -> usize {
        self.token_expires_in.num_seconds() as usize
    }
}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, ApiError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    if token.is_empty() {
        return Err(ApiError::Unauthenticated);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_token_creation_and_validation() {
        let jwt_service = JwtService::new("test_secret");
        let user_id = Uuid::new_v4();

        let token = jwt_service.create_token(user_id).unwrap();
        let claims = jwt_service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_different_key_is_rejected() {
        let issuer = JwtService::new("test_secret");
        let verifier = JwtService::new("another_secret");

        let token = issuer.create_token(Uuid::new_v4()).unwrap();

        assert_matches!(verifier.validate_token(&token), Err(ApiError::InvalidToken));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt_service = JwtService::new("test_secret");
        let now = Utc::now();

        // Well past the default 60s validation leeway
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: (now - Duration::hours(1)).timestamp() as usize,
            iat: (now - Duration::hours(2)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret"),
        )
        .unwrap();

        assert_matches!(
            jwt_service.validate_token(&token),
            Err(ApiError::InvalidToken)
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let jwt_service = JwtService::new("test_secret");

        assert_matches!(
            jwt_service.validate_token("not-a-token"),
            Err(ApiError::InvalidToken)
        );
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            extract_bearer_token("Bearer test_token").unwrap(),
            "test_token"
        );

        assert!(extract_bearer_token("Invalid header").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("bearer test_token").is_err());
    }
}
