//! Credential management (admin only). Secrets are write-only.

use crate::auth::{AuthService, NewCredential};
use crate::error::AppError;
use crate::extractors::caller::Admin;
use crate::response::respond_list;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = AuthService::list_credentials(&state.store).await?;
    Ok(respond_list(rows))
}

pub async fn create(
    _admin: Admin,
    State(state): State<AppState>,
    Json(body): Json<NewCredential>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    AuthService::create_credential(&state.store, &body).await?;
    Ok(StatusCode::CREATED)
}

pub async fn delete(
    _admin: Admin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    AuthService::delete_credential(&state.store, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
