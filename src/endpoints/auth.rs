use axum::extract::State;
use axum::{Json, debug_handler};
use axum_valid::Valid;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::{ApiError, TokenResponse};
use crate::identity::NewUser;
use crate::state::SharedState;

#[derive(Deserialize, Validate)]
#[must_use]
pub struct RegisterPayload {
    #[validate(length(min = 1, max = 64))]
    username: String,
    #[validate(length(min = 1, max = 128))]
    password: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    phone: String,
}

/// `POST /auth/register`: create the user and return their first session
/// token in one round trip.
#[instrument(skip_all, fields(username = payload.username))]
#[debug_handler]
pub async fn register(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegisterPayload>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let new_user = NewUser {
        username: payload.username,
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
    };
    let token = state.identity.register(&new_user).await?;
    Ok(Json(TokenResponse { token }))
}

#[derive(Deserialize, Validate)]
#[must_use]
pub struct LoginPayload {
    #[validate(length(min = 1, max = 64))]
    username: String,
    #[validate(length(min = 1, max = 128))]
    password: String,
}

/// `POST /auth/login`: `{username, password}` to `{token}`. All failed
/// credential checks look identical to the caller.
#[instrument(skip_all, fields(username = payload.username))]
#[debug_handler]
pub async fn login(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<LoginPayload>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .identity
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}
