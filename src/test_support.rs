//! In-memory repositories for handler tests. They enforce the same
//! constraints as the Postgres schema in `migrations/`.

use std::sync::Mutex;

use axum::async_trait;

use crate::{
    error::AppError,
    exercises::{
        repo::ExerciseRepo,
        repo_types::{Exercise, LogFilter, NewExercise},
    },
    users::{repo::UserRepo, repo_types::User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    exercises: Vec<Exercise>,
}

#[derive(Default)]
pub struct MemoryRepo {
    tables: Mutex<Tables>,
}

impl MemoryRepo {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserRepo for MemoryRepo {
    async fn create(&self, username: &str) -> Result<User, AppError> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict("username already taken".into()));
        }
        let user = User {
            id: t.users.len() as i64 + 1,
            username: username.to_owned(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.lock().users.clone())
    }

    async fn find_username(&self, id: i64) -> Result<Option<String>, AppError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.username.clone()))
    }
}

#[async_trait]
impl ExerciseRepo for MemoryRepo {
    async fn insert(&self, new: NewExercise) -> Result<Exercise, AppError> {
        let mut t = self.lock();
        if !t.users.iter().any(|u| u.id == new.user_id) {
            return Err(AppError::NotFound(format!("unknown userId {}", new.user_id)));
        }
        let row = Exercise {
            id: t.exercises.len() as i64 + 1,
            user_id: new.user_id,
            description: new.description,
            duration: new.duration,
            date: new.date,
        };
        t.exercises.push(row.clone());
        Ok(row)
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        filter: &LogFilter,
    ) -> Result<Vec<Exercise>, AppError> {
        let limit = filter
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));
        Ok(self
            .lock()
            .exercises
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| filter.from.map_or(true, |from| e.date >= from))
            .filter(|e| filter.to.map_or(true, |to| e.date <= to))
            .take(limit)
            .cloned()
            .collect())
    }
}
