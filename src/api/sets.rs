use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{require_auth, AuthService, CurrentUser, MessageResponse};
use crate::errors::ApiError;
use crate::models::Set;
use crate::services::SetService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetRequest {
    pub reps: i32,
    pub weight: f64,
    pub exercise_id: Uuid,
}

impl CreateSetRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.reps < 1 {
            return Err("Reps must be a positive integer");
        }
        if self.weight < 0.0 {
            return Err("Weight must be non-negative");
        }
        Ok(())
    }
}

/// Set routes, all behind bearer authentication
pub fn set_routes(auth_service: AuthService, set_service: SetService) -> Router {
    Router::new()
        .route("/", post(create_set))
        .route("/:id", delete(delete_set))
        .route_layer(middleware::from_fn_with_state(auth_service, require_auth))
        .with_state(set_service)
}

/// Record a set under an owned exercise
#[tracing::instrument(skip_all)]
async fn create_set(
    State(set_service): State<SetService>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateSetRequest>, ApiError>,
) -> Result<(StatusCode, Json<Set>), ApiError> {
    request
        .validate()
        .map_err(|message| ApiError::Validation(message.to_string()))?;

    let set = set_service
        .create_set(user.id, request.exercise_id, request.reps, request.weight)
        .await?;

    Ok((StatusCode::CREATED, Json(set)))
}

/// Delete a set whose ownership chain resolves to the caller
#[tracing::instrument(skip_all)]
async fn delete_set(
    State(set_service): State<SetService>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Path(set_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = set_service.delete_set(user.id, set_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Set not found"));
    }

    Ok(Json(MessageResponse {
        message: "Set deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_validation() {
        let valid = CreateSetRequest {
            reps: 5,
            weight: 100.0,
            exercise_id: Uuid::new_v4(),
        };
        assert!(valid.validate().is_ok());

        let bodyweight = CreateSetRequest {
            reps: 12,
            weight: 0.0,
            exercise_id: Uuid::new_v4(),
        };
        assert!(bodyweight.validate().is_ok());

        let zero_reps = CreateSetRequest {
            reps: 0,
            weight: 100.0,
            exercise_id: Uuid::new_v4(),
        };
        assert!(zero_reps.validate().is_err());

        let negative_weight = CreateSetRequest {
            reps: 5,
            weight: -10.0,
            exercise_id: Uuid::new_v4(),
        };
        assert!(negative_weight.validate().is_err());
    }
}
