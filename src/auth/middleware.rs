use axum::{
    extract::{Request, State},
    http::header::{self, HeaderValue, AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::auth::{extract_bearer_token, AuthService};
use crate::errors::ApiError;

/// Bearer-token authentication middleware. Verifies the presented token,
/// re-checks the identity against the credential store, and makes the
/// resolved user available to handlers via request extensions.
pub async fn require_auth(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = extract_bearer_token(auth_header)?;

    let user = auth_service.authenticate(token).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Permissive CORS for the browser client
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Security headers middleware
pub fn security_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
}
