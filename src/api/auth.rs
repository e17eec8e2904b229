use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use axum_extra::extract::WithRejection;

use crate::auth::{AuthResponse, AuthService, LoginRequest, RegisterRequest};
use crate::errors::ApiError;

/// Authentication routes
pub fn auth_routes(auth_service: AuthService) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(auth_service)
}

/// Register a new user
#[tracing::instrument(skip_all)]
async fn register(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let response = auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login user
#[tracing::instrument(skip_all)]
async fn login(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}
