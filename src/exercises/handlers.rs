use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    exercises::{
        dates,
        dto::{ExerciseAddedResponse, LogQuery, LogRequest, LogResponse, NewExerciseRequest},
        repo_types::NewExercise,
    },
    payload::Payload,
    state::AppState,
};

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/api/exercise/add", post(add_exercise))
        .route("/api/exercise/log", get(get_log))
}

async fn username_of(state: &AppState, user_id: i64) -> Result<String, AppError> {
    match state.users.find_username(user_id).await? {
        Some(name) => Ok(name),
        None => {
            warn!(user_id, "unknown user");
            Err(AppError::NotFound(format!("unknown userId {user_id}")))
        }
    }
}

/// The username lookup and the insert are two separate statements. Users
/// are never removed, so the name read first is still valid after the insert.
#[instrument(skip(state, payload))]
pub async fn add_exercise(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<ExerciseAddedResponse>, AppError> {
    let req = NewExerciseRequest::try_from(&payload)?;
    let username = username_of(&state, req.user_id).await?;

    let date = req
        .date
        .unwrap_or_else(|| dates::today(state.config.local_offset));
    let exercise = state
        .exercises
        .insert(NewExercise {
            user_id: req.user_id,
            description: req.description,
            duration: req.duration,
            date,
        })
        .await?;

    info!(user_id = exercise.user_id, exercise_id = exercise.id, "exercise added");
    Ok(Json(ExerciseAddedResponse::new(username, exercise)))
}

#[instrument(skip(state))]
pub async fn get_log(
    State(state): State<AppState>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> Result<Json<LogResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let req = LogRequest::try_from(query)?;
    let username = username_of(&state, req.user_id).await?;

    let exercises = state
        .exercises
        .list_for_user(req.user_id, &req.filter)
        .await?;
    Ok(Json(LogResponse::new(req.user_id, username, exercises)))
}
