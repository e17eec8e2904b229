use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single set: repetitions at a weight, owned by an exercise
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub reps: i32,
    pub weight: f64,
}
