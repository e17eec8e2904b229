use axum::{routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::exercises::exercise_routes;
use super::health::{health_check, root};
use super::sets::set_routes;
use super::workouts::workout_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService};
use crate::services::{ExerciseService, SetService, WorkoutService};

pub fn create_routes(db: PgPool, jwt_secret: &str) -> Router {
    let auth_service = AuthService::new(db.clone(), jwt_secret);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", auth_routes(auth_service.clone()))
        .nest(
            "/api/workouts",
            workout_routes(auth_service.clone(), WorkoutService::new(db.clone())),
        )
        .nest(
            "/exercises",
            exercise_routes(auth_service.clone(), ExerciseService::new(db.clone())),
        )
        .nest("/sets", set_routes(auth_service, SetService::new(db)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security_headers_layer())
                .layer(cors_layer()),
        )
}
