use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    payload::Payload,
    state::AppState,
    users::dto::{NewUserRequest, UserResponse},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/exercise/new-user", post(new_user))
        .route("/api/exercise/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn new_user(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<UserResponse>, AppError> {
    let req = NewUserRequest::try_from(&payload)?;

    let user = match state.users.create(&req.username).await {
        Ok(u) => u,
        Err(AppError::Conflict(msg)) => {
            warn!(username = %req.username, "username already taken");
            return Err(AppError::Conflict(msg));
        }
        Err(e) => return Err(e),
    };

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
