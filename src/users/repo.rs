use axum::async_trait;
use tracing::debug;

use crate::{
    db::PgRepo,
    error::{is_unique_violation, AppError},
    users::repo_types::User,
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new user. A taken username is reported as `Conflict`.
    async fn create(&self, username: &str) -> Result<User, AppError>;

    /// All users, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn find_username(&self, id: i64) -> Result<Option<String>, AppError>;
}

#[async_trait]
impl UserRepo for PgRepo {
    async fn create(&self, username: &str) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            RETURNING id, username
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                debug!(user_id = user.id, "user row inserted");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::Conflict("username already taken".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_username(&self, id: i64) -> Result<Option<String>, AppError> {
        let username = sqlx::query_scalar::<_, String>(
            r#"SELECT username FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(username)
    }
}
