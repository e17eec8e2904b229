use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Set;

/// An exercise within a workout. The name is stored trimmed and lowercased
/// and is unique within its parent workout.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub name: String,
}

/// An exercise with its sets attached
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetail {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub name: String,
    pub sets: Vec<Set>,
}
