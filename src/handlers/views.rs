//! Read projections: a customer's own portal and the admin overview.

use crate::error::AppError;
use crate::extractors::caller::{Admin, Caller};
use crate::handlers::parse_id;
use crate::model::CustomerId;
use crate::response::respond;
use crate::service::ViewService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};

/// GET /me: the caller's own customer view. The customer id comes from authentication, never
/// from the request, so one customer cannot ask for another's data.
pub async fn me(
    Caller(auth): Caller,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let customer_id = auth
        .customer_id
        .ok_or_else(|| AppError::Forbidden("no customer is bound to this login".into()))?;
    let view = ViewService::customer_view(&state.store, customer_id).await?;
    Ok(respond(StatusCode::OK, view))
}

pub async fn customer_view(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = CustomerId(parse_id(&id_str)?);
    let view = ViewService::customer_view(&state.store, id).await?;
    Ok(respond(StatusCode::OK, view))
}

pub async fn admin_view(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let view = ViewService::admin_view(&state.store).await?;
    Ok(respond(StatusCode::OK, view))
}
