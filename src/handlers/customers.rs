//! Customer CRUD handlers (admin only).

use crate::error::AppError;
use crate::extractors::caller::Admin;
use crate::handlers::parse_id;
use crate::model::CustomerId;
use crate::response::{respond, respond_list};
use crate::service::{CustomerInput, CustomerService};
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
    let rows = CustomerService::list(&state.store).await?;
    Ok(respond_list(rows))
}

pub async fn create(
    _admin: Admin,
    State(state): State<AppState>,
    Json(body): Json<CustomerInput>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = CustomerService::create(&state.store, &body).await?;
    let customer = CustomerService::get(&state.store, id).await?;
    Ok(respond(StatusCode::CREATED, customer))
}

pub async fn read(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = CustomerId(parse_id(&id_str)?);
    let customer = CustomerService::get(&state.store, id).await?;
    Ok(respond(StatusCode::OK, customer))
}

pub async fn update(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<CustomerInput>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = CustomerId(parse_id(&id_str)?);
    CustomerService::update(&state.store, id, &body).await?;
    let customer = CustomerService::get(&state.store, id).await?;
    Ok(respond(StatusCode::OK, customer))
}

pub async fn delete(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = CustomerId(parse_id(&id_str)?);
    CustomerService::delete(&state.store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
