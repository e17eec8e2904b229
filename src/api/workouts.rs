use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::auth::{require_auth, AuthService, CurrentUser, MessageResponse};
use crate::errors::ApiError;
use crate::models::{Workout, WorkoutDetail};
use crate::services::WorkoutService;

/// Workout routes, all behind bearer authentication
pub fn workout_routes(auth_service: AuthService, workout_service: WorkoutService) -> Router {
    Router::new()
        .route("/", post(create_workout).get(list_workouts))
        .route("/:id", get(get_workout).delete(delete_workout))
        .route_layer(middleware::from_fn_with_state(auth_service, require_auth))
        .with_state(workout_service)
}

/// Create an empty workout for the authenticated user
#[tracing::instrument(skip_all)]
async fn create_workout(
    State(workout_service): State<WorkoutService>,
    Extension(user): Extension<CurrentUser>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    let workout = workout_service.create_workout(user.id).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

/// All workouts for the authenticated user, with exercises and sets nested
#[tracing::instrument(skip_all)]
async fn list_workouts(
    State(workout_service): State<WorkoutService>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<WorkoutDetail>>, ApiError> {
    let workouts = workout_service.list_workouts(user.id).await?;
    Ok(Json(workouts))
}

/// A single owned workout; foreign workouts read as not found
#[tracing::instrument(skip_all)]
async fn get_workout(
    State(workout_service): State<WorkoutService>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Path(workout_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    let workout = workout_service
        .get_workout(user.id, workout_id)
        .await?
        .ok_or(ApiError::NotFound("Workout not found"))?;

    Ok(Json(workout))
}

/// Delete an owned workout and everything under it
#[tracing::instrument(skip_all)]
async fn delete_workout(
    State(workout_service): State<WorkoutService>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Path(workout_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = workout_service.delete_workout(user.id, workout_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Workout not found"));
    }

    Ok(Json(MessageResponse {
        message: "Workout deleted".to_string(),
    }))
}
