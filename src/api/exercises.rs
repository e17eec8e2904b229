use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::post,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{require_auth, AuthService, CurrentUser};
use crate::errors::ApiError;
use crate::models::Exercise;
use crate::services::ExerciseService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub name: String,
    pub workout_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisesQuery {
    pub workout_id: Uuid,
}

/// Exercise routes, all behind bearer authentication
pub fn exercise_routes(auth_service: AuthService, exercise_service: ExerciseService) -> Router {
    Router::new()
        .route("/", post(create_exercise).get(list_exercises))
        .route_layer(middleware::from_fn_with_state(auth_service, require_auth))
        .with_state(exercise_service)
}

/// Create an exercise under an owned workout
#[tracing::instrument(skip_all)]
async fn create_exercise(
    State(exercise_service): State<ExerciseService>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateExerciseRequest>, ApiError>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    let exercise = exercise_service
        .create_exercise(user.id, request.workout_id, &request.name)
        .await?;

    Ok((StatusCode::CREATED, Json(exercise)))
}

/// Exercises of an owned workout, alphabetical
#[tracing::instrument(skip_all)]
async fn list_exercises(
    State(exercise_service): State<ExerciseService>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Query(query), _): WithRejection<Query<ExercisesQuery>, ApiError>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let exercises = exercise_service
        .list_exercises(user.id, query.workout_id)
        .await?;

    Ok(Json(exercises))
}
