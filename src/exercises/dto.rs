use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    error::AppError,
    exercises::{
        dates,
        repo_types::{Exercise, LogFilter},
    },
    payload::Payload,
};

/// Body of `POST /api/exercise/add`.
#[derive(Debug, PartialEq, Eq)]
pub struct NewExerciseRequest {
    pub user_id: i64,
    pub description: String,
    pub duration: i32,
    pub date: Option<Date>, // None -> today
}

impl TryFrom<&Payload> for NewExerciseRequest {
    type Error = AppError;

    fn try_from(payload: &Payload) -> Result<Self, Self::Error> {
        let user_id = payload
            .integer::<i64>("userId")?
            .ok_or_else(|| AppError::bad_request("userId is required"))?;
        // stored exactly as sent; only all-blank descriptions are refused
        let description = payload
            .text("description")?
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("description is required"))?
            .to_owned();
        let duration = payload
            .integer::<i32>("duration")?
            .ok_or_else(|| AppError::bad_request("duration is required"))?;
        let date = payload
            .non_blank_text("date")?
            .map(|d| dates::parse_short("date", d))
            .transpose()?;

        Ok(Self {
            user_id,
            description,
            duration,
            date,
        })
    }
}

/// Raw query string of `GET /api/exercise/log`; every field is validated in
/// [`LogRequest::try_from`] so that bad values come back as JSON errors.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct LogRequest {
    pub user_id: i64,
    pub filter: LogFilter,
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl TryFrom<LogQuery> for LogRequest {
    type Error = AppError;

    fn try_from(q: LogQuery) -> Result<Self, Self::Error> {
        let user_id = present(&q.user_id)
            .ok_or_else(|| AppError::bad_request("userId is required"))?
            .parse::<i64>()
            .map_err(|_| AppError::bad_request("userId must be an integer"))?;
        let from = present(&q.from)
            .map(|d| dates::parse_short("from", d))
            .transpose()?;
        let to = present(&q.to)
            .map(|d| dates::parse_short("to", d))
            .transpose()?;
        let limit = present(&q.limit)
            .map(|l| {
                l.parse::<i64>()
                    .ok()
                    .filter(|n| *n >= 0)
                    .ok_or_else(|| AppError::bad_request("limit must be a non-negative integer"))
            })
            .transpose()?;

        Ok(Self {
            user_id,
            filter: LogFilter { from, to, limit },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ExerciseAddedResponse {
    pub username: String,
    pub description: String,
    pub duration: i32,
    #[serde(rename = "_id")]
    pub user_id: i64,
    pub date: String, // long form
}

impl ExerciseAddedResponse {
    pub fn new(username: String, exercise: Exercise) -> Self {
        Self {
            username,
            description: exercise.description,
            duration: exercise.duration,
            user_id: exercise.user_id,
            date: dates::format_long(exercise.date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i32,
    pub date: String, // short form
}

impl From<Exercise> for LogEntry {
    fn from(e: Exercise) -> Self {
        Self {
            description: e.description,
            duration: e.duration,
            date: dates::format_short(e.date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    #[serde(rename = "_id")]
    pub user_id: i64,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

impl LogResponse {
    /// `count` is always derived from the entries, never supplied.
    pub fn new(user_id: i64, username: String, exercises: Vec<Exercise>) -> Self {
        let log: Vec<LogEntry> = exercises.into_iter().map(LogEntry::from).collect();
        Self {
            user_id,
            username,
            count: log.len(),
            log,
        }
    }
}
