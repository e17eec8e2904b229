use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("No token provided")]
    Unauthenticated,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Exercise already exists for this workout")]
    DuplicateExercise,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Password processing error: {0}")]
    Password(#[from] crate::auth::password::PasswordError),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail | ApiError::DuplicateExercise => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials | ApiError::Unauthenticated | ApiError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Password(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Store and hashing failures are logged but never echoed to clients
        let message = match &self {
            ApiError::Database(_) | ApiError::Password(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Detect a unique-constraint violation so concurrent duplicate inserts
/// surface as a duplicate error instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        assert_eq!(
            ApiError::Validation("Exercise name is required".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::DuplicateExercise.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_errors_map_to_unauthorized() {
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            ApiError::NotFound("Workout not found").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let response = ApiError::Internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
