use chrono::Utc;
use regex::Regex;
use sqlx::PgPool;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthResponse, CurrentUser, JwtService, LoginRequest, RegisterRequest};
use crate::errors::{is_unique_violation, ApiError};
use crate::models::{User, UserResponse};

// bcrypt ignores everything past 72 bytes; reject instead of silently truncating
const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            db,
        }
    }

    /// Register a new user and issue a session token bound to the identity
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
        let name = request.name.trim().to_string();
        let email = normalize_email(&request.email);

        validate_registration(&name, &email, &request.password)?;

        if self.find_user_by_email(&email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();

        // The unique constraint on email arbitrates concurrent registrations
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING id, name, email, password_hash, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&name)
        .bind(&email)
        .bind(&password_hash)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ApiError::DuplicateEmail
            } else {
                ApiError::Database(err)
            }
        })?;

        let token = self.jwt_service.create_token(user.id)?;

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// Login with email and password. Unknown email and wrong password
    /// produce the same error so accounts cannot be enumerated.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let email = normalize_email(&request.email);

        let user = self
            .find_user_by_email(&email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.jwt_service.create_token(user.id)?;

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// Resolve a presented token to a user identity. Signature and expiry
    /// are checked offline; the user row is then re-fetched so a token for
    /// a deleted user is rejected.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, ApiError> {
        let claims = self.jwt_service.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::InvalidToken)?;

        let user = self
            .find_user_by_id(user_id)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
            email: user.email,
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    });

    regex.is_match(email)
}

fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }

    if !is_valid_email(email) {
        return Err(ApiError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    if password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::Validation(
            "Password must be no more than 72 characters long".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_email_validation() {
        let valid_emails = vec![
            "user@example.com",
            "test.user@domain.co.uk",
            "athlete123@gmail.com",
        ];

        let invalid_emails = vec![
            "invalid-email",
            "@domain.com",
            "user@",
            "user.domain.com",
            "",
            "user@domain",
        ];

        for email in valid_emails {
            assert!(is_valid_email(email), "Should accept valid email: {}", email);
        }

        for email in invalid_emails {
            assert!(
                !is_valid_email(email),
                "Should reject invalid email: {}",
                email
            );
        }
    }

    #[test]
    fn test_email_normalization() {
        let test_cases = vec![
            ("USER@EXAMPLE.COM", "user@example.com"),
            ("User@Example.Com", "user@example.com"),
            ("  user@example.com  ", "user@example.com"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(normalize_email(input), expected);
        }
    }

    #[test]
    fn test_registration_validation() {
        assert!(validate_registration("Alice", "a@x.com", "pw1").is_ok());

        assert_matches!(
            validate_registration("", "a@x.com", "pw1"),
            Err(ApiError::Validation(_))
        );
        assert_matches!(
            validate_registration("Alice", "not-an-email", "pw1"),
            Err(ApiError::Validation(_))
        );
        assert_matches!(
            validate_registration("Alice", "a@x.com", ""),
            Err(ApiError::Validation(_))
        );
        assert_matches!(
            validate_registration("Alice", "a@x.com", &"x".repeat(73)),
            Err(ApiError::Validation(_))
        );
    }
}
