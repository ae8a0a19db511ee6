//! POST /auth/login: check a username/password pair and report its role.

use crate::auth::AuthService;
use crate::error::AppError;
use crate::response::respond;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let auth = AuthService::authenticate(&state.store, &body.username, &body.password).await?;
    Ok(respond(StatusCode::OK, auth))
}
