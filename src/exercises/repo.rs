use axum::async_trait;
use tracing::debug;

use crate::{
    db::PgRepo,
    error::{is_foreign_key_violation, AppError},
    exercises::repo_types::{Exercise, LogFilter, NewExercise},
};

#[async_trait]
pub trait ExerciseRepo: Send + Sync {
    /// Append an entry. An unknown `user_id` is reported as `NotFound`.
    async fn insert(&self, new: NewExercise) -> Result<Exercise, AppError>;

    /// A user's entries in insertion order, bounded by `filter`.
    async fn list_for_user(&self, user_id: i64, filter: &LogFilter)
        -> Result<Vec<Exercise>, AppError>;
}

#[async_trait]
impl ExerciseRepo for PgRepo {
    async fn insert(&self, new: NewExercise) -> Result<Exercise, AppError> {
        let result = sqlx::query_as::<_, Exercise>(
            r#"
            INSERT INTO exercises (user_id, description, duration, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, description, duration, date
            "#,
        )
        .bind(new.user_id)
        .bind(&new.description)
        .bind(new.duration)
        .bind(new.date)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                debug!(exercise_id = row.id, user_id = row.user_id, "exercise row inserted");
                Ok(row)
            }
            Err(e) if is_foreign_key_violation(&e) => {
                Err(AppError::NotFound(format!("unknown userId {}", new.user_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        filter: &LogFilter,
    ) -> Result<Vec<Exercise>, AppError> {
        // NULL bounds and a NULL LIMIT leave the corresponding constraint off
        let rows = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, user_id, description, duration, date
            FROM exercises
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY id
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
