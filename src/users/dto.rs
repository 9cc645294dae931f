use serde::Serialize;

use crate::{error::AppError, payload::Payload, users::repo_types::User};

/// Body of `POST /api/exercise/new-user`.
#[derive(Debug, PartialEq, Eq)]
pub struct NewUserRequest {
    pub username: String,
}

impl TryFrom<&Payload> for NewUserRequest {
    type Error = AppError;

    fn try_from(payload: &Payload) -> Result<Self, Self::Error> {
        // stored exactly as sent; only all-blank names are refused
        let username = payload
            .text("username")?
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("username is required"))?;
        Ok(Self {
            username: username.to_owned(),
        })
    }
}

/// Public shape of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
        }
    }
}
