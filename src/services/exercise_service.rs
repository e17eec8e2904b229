use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{is_unique_violation, ApiError};
use crate::models::Exercise;

#[derive(Clone)]
pub struct ExerciseService {
    db: PgPool,
}

impl ExerciseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an exercise under a workout the caller owns. The name is
    /// normalized before the uniqueness check and storage, so "Bench Press"
    /// and "bench press " collide.
    pub async fn create_exercise(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        name: &str,
    ) -> Result<Exercise, ApiError> {
        let name = normalize_exercise_name(name);

        if name.is_empty() {
            return Err(ApiError::Validation(
                "Exercise name is required".to_string(),
            ));
        }

        self.verify_workout_owner(user_id, workout_id).await?;

        let existing = sqlx::query_as::<_, Exercise>(
            "SELECT id, workout_id, name FROM exercises
             WHERE workout_id = $1 AND name = $2",
        )
        .bind(workout_id)
        .bind(&name)
        .fetch_optional(&self.db)
        .await?;

        if existing.is_some() {
            return Err(ApiError::DuplicateExercise);
        }

        // The unique constraint backstops concurrent creations of the same name
        let exercise = sqlx::query_as::<_, Exercise>(
            "INSERT INTO exercises (id, workout_id, name)
             VALUES ($1, $2, $3)
             RETURNING id, workout_id, name",
        )
        .bind(Uuid::new_v4())
        .bind(workout_id)
        .bind(&name)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ApiError::DuplicateExercise
            } else {
                ApiError::Database(err)
            }
        })?;

        Ok(exercise)
    }

    /// Exercises of an owned workout, alphabetical by name
    pub async fn list_exercises(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<Vec<Exercise>, ApiError> {
        self.verify_workout_owner(user_id, workout_id).await?;

        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, workout_id, name FROM exercises
             WHERE workout_id = $1
             ORDER BY name ASC",
        )
        .bind(workout_id)
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }

    /// A workout owned by someone else is indistinguishable from a missing one
    async fn verify_workout_owner(&self, user_id: Uuid, workout_id: Uuid) -> Result<(), ApiError> {
        let owned = sqlx::query("SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        if owned.is_none() {
            return Err(ApiError::NotFound("Workout not found"));
        }

        Ok(())
    }
}

pub fn normalize_exercise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_exercise_name("Bench Press"), "bench press");
        assert_eq!(normalize_exercise_name("bench press "), "bench press");
        assert_eq!(normalize_exercise_name("  SQUAT  "), "squat");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_exercise_name("  Overhead Press ");
        let twice = normalize_exercise_name(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_blank_names_normalize_to_empty() {
        assert_eq!(normalize_exercise_name(""), "");
        assert_eq!(normalize_exercise_name("   "), "");
        assert_eq!(normalize_exercise_name("\t\n"), "");
    }
}
