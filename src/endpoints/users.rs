use axum::extract::{Path, State};
use axum::{Json, debug_handler};
use serde::Serialize;
use tracing::instrument;

use super::ApiError;
use crate::auth::Session;
use crate::models::{ReceivedMessage, SentMessage, UserProfile, UserSummary};
use crate::state::SharedState;

#[derive(Serialize, Debug)]
#[must_use]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Serialize, Debug)]
#[must_use]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Serialize, Debug)]
#[must_use]
pub struct SentMessagesResponse {
    pub messages: Vec<SentMessage>,
}

#[derive(Serialize, Debug)]
#[must_use]
pub struct ReceivedMessagesResponse {
    pub messages: Vec<ReceivedMessage>,
}

/// `GET /users`: basic info on all users.
#[instrument(skip_all)]
#[debug_handler]
pub async fn list(
    State(state): State<SharedState>,
    _session: Session,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.identity.list().await?;
    Ok(Json(UserListResponse { users }))
}

/// `GET /users/{username}`: full profile, or 404.
#[instrument(skip_all, fields(username = %username))]
#[debug_handler]
pub async fn get(
    State(state): State<SharedState>,
    _session: Session,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.identity.get(&username).await?;
    Ok(Json(UserResponse { user }))
}

/// `GET /users/{username}/to`: messages received by this user, each with
/// the sender's current profile fields.
#[instrument(skip_all, fields(username = %username))]
#[debug_handler]
pub async fn messages_to(
    State(state): State<SharedState>,
    _session: Session,
    Path(username): Path<String>,
) -> Result<Json<ReceivedMessagesResponse>, ApiError> {
    let messages = state.repository.messages.messages_to(&username).await?;
    Ok(Json(ReceivedMessagesResponse { messages }))
}

/// `GET /users/{username}/from`: messages sent by this user, each with the
/// recipient's current profile fields.
#[instrument(skip_all, fields(username = %username))]
#[debug_handler]
pub async fn messages_from(
    State(state): State<SharedState>,
    _session: Session,
    Path(username): Path<String>,
) -> Result<Json<SentMessagesResponse>, ApiError> {
    let messages = state.repository.messages.messages_from(&username).await?;
    Ok(Json(SentMessagesResponse { messages }))
}
