use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{Exercise, ExerciseDetail, Set, Workout, WorkoutDetail};

#[derive(Clone)]
pub struct WorkoutService {
    db: PgPool,
}

impl WorkoutService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an empty workout dated now
    pub async fn create_workout(&self, user_id: Uuid) -> Result<Workout, ApiError> {
        let workout = sqlx::query_as::<_, Workout>(
            "INSERT INTO workouts (id, user_id, date)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, date",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(workout)
    }

    /// All of a user's workouts, newest date first with ties stable by id,
    /// exercises and sets attached with one fetch per entity rather than
    /// per-item round trips.
    pub async fn list_workouts(&self, user_id: Uuid) -> Result<Vec<WorkoutDetail>, ApiError> {
        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, date FROM workouts
             WHERE user_id = $1
             ORDER BY date DESC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let workout_ids: Vec<Uuid> = workouts.iter().map(|workout| workout.id).collect();

        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, workout_id, name FROM exercises
             WHERE workout_id = ANY($1)
             ORDER BY name ASC",
        )
        .bind(&workout_ids)
        .fetch_all(&self.db)
        .await?;

        let exercise_ids: Vec<Uuid> = exercises.iter().map(|exercise| exercise.id).collect();

        let sets = sqlx::query_as::<_, Set>(
            "SELECT id, exercise_id, reps, weight FROM sets
             WHERE exercise_id = ANY($1)
             ORDER BY id ASC",
        )
        .bind(&exercise_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(assemble_details(workouts, exercises, sets))
    }

    /// One workout with nested detail. Ownership is part of the lookup, so a
    /// foreign workout resolves to None exactly like a missing one.
    pub async fn get_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<Option<WorkoutDetail>, ApiError> {
        let workout = sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, date FROM workouts
             WHERE id = $1 AND user_id = $2",
        )
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(workout) = workout else {
            return Ok(None);
        };

        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, workout_id, name FROM exercises
             WHERE workout_id = $1
             ORDER BY name ASC",
        )
        .bind(workout.id)
        .fetch_all(&self.db)
        .await?;

        let exercise_ids: Vec<Uuid> = exercises.iter().map(|exercise| exercise.id).collect();

        let sets = sqlx::query_as::<_, Set>(
            "SELECT id, exercise_id, reps, weight FROM sets
             WHERE exercise_id = ANY($1)
             ORDER BY id ASC",
        )
        .bind(&exercise_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(assemble_details(vec![workout], exercises, sets).pop())
    }

    /// Delete an owned workout; the store cascades to exercises and sets.
    /// Returns false when the id is missing or owned by someone else.
    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Group flat child rows under their parents, preserving the row order the
/// queries established.
fn assemble_details(
    workouts: Vec<Workout>,
    exercises: Vec<Exercise>,
    sets: Vec<Set>,
) -> Vec<WorkoutDetail> {
    let mut sets_by_exercise: HashMap<Uuid, Vec<Set>> = HashMap::new();
    for set in sets {
        sets_by_exercise.entry(set.exercise_id).or_default().push(set);
    }

    let mut exercises_by_workout: HashMap<Uuid, Vec<ExerciseDetail>> = HashMap::new();
    for exercise in exercises {
        let sets = sets_by_exercise.remove(&exercise.id).unwrap_or_default();
        exercises_by_workout
            .entry(exercise.workout_id)
            .or_default()
            .push(ExerciseDetail {
                id: exercise.id,
                workout_id: exercise.workout_id,
                name: exercise.name,
                sets,
            });
    }

    workouts
        .into_iter()
        .map(|workout| {
            let exercises = exercises_by_workout.remove(&workout.id).unwrap_or_default();
            WorkoutDetail {
                id: workout.id,
                user_id: workout.user_id,
                date: workout.date,
                exercises,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn workout(user_id: Uuid, offset_hours: i64) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            user_id,
            date: Utc::now() - Duration::hours(offset_hours),
        }
    }

    fn exercise(workout_id: Uuid, name: &str) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            workout_id,
            name: name.to_string(),
        }
    }

    fn set(exercise_id: Uuid, reps: i32, weight: f64) -> Set {
        Set {
            id: Uuid::new_v4(),
            exercise_id,
            reps,
            weight,
        }
    }

    #[test]
    fn test_assemble_groups_children_under_parents() {
        let user_id = Uuid::new_v4();
        let first = workout(user_id, 0);
        let second = workout(user_id, 24);

        let squat = exercise(first.id, "squat");
        let bench = exercise(second.id, "bench press");
        let squat_set = set(squat.id, 5, 100.0);

        let details = assemble_details(
            vec![first.clone(), second.clone()],
            vec![squat.clone(), bench.clone()],
            vec![squat_set.clone()],
        );

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].id, first.id);
        assert_eq!(details[0].exercises.len(), 1);
        assert_eq!(details[0].exercises[0].name, "squat");
        assert_eq!(details[0].exercises[0].sets.len(), 1);
        assert_eq!(details[0].exercises[0].sets[0].reps, 5);
        assert_eq!(details[1].exercises[0].name, "bench press");
        assert!(details[1].exercises[0].sets.is_empty());
    }

    #[test]
    fn test_assemble_preserves_workout_order() {
        let user_id = Uuid::new_v4();
        let newest = workout(user_id, 0);
        let older = workout(user_id, 48);

        let details = assemble_details(vec![newest.clone(), older.clone()], vec![], vec![]);

        assert_eq!(details[0].id, newest.id);
        assert_eq!(details[1].id, older.id);
        assert!(details[0].exercises.is_empty());
    }

    #[test]
    fn test_assemble_ignores_orphan_children() {
        let user_id = Uuid::new_v4();
        let only = workout(user_id, 0);
        let stray = exercise(Uuid::new_v4(), "curl");

        let details = assemble_details(vec![only], vec![stray], vec![]);

        assert_eq!(details.len(), 1);
        assert!(details[0].exercises.is_empty());
    }
}
