use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::Set;

#[derive(Clone)]
pub struct SetService {
    db: PgPool,
}

impl SetService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a set under an exercise whose ownership chain resolves to the
    /// caller. A foreign or missing exercise reads as not found.
    pub async fn create_set(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        reps: i32,
        weight: f64,
    ) -> Result<Set, ApiError> {
        let owned = sqlx::query(
            "SELECT exercises.id FROM exercises
             JOIN workouts ON workouts.id = exercises.workout_id
             WHERE exercises.id = $1 AND workouts.user_id = $2",
        )
        .bind(exercise_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        if owned.is_none() {
            return Err(ApiError::NotFound("Exercise not found"));
        }

        let set = sqlx::query_as::<_, Set>(
            "INSERT INTO sets (id, exercise_id, reps, weight)
             VALUES ($1, $2, $3, $4)
             RETURNING id, exercise_id, reps, weight",
        )
        .bind(Uuid::new_v4())
        .bind(exercise_id)
        .bind(reps)
        .bind(weight)
        .fetch_one(&self.db)
        .await?;

        Ok(set)
    }

    /// Delete a set only if its exercise→workout→user chain resolves to the
    /// caller. Returns false for missing or foreign sets.
    pub async fn delete_set(&self, user_id: Uuid, set_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "DELETE FROM sets
             USING exercises, workouts
             WHERE sets.id = $1
               AND sets.exercise_id = exercises.id
               AND exercises.workout_id = workouts.id
               AND workouts.user_id = $2",
        )
        .bind(set_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
