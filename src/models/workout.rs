use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::ExerciseDetail;

/// A workout shell: one user, one date, exercises attached separately
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
}

/// A workout with its exercises and their sets eagerly attached
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub exercises: Vec<ExerciseDetail>,
}
