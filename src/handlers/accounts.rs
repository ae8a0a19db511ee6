//! Account handlers (admin only). Amounts arrive as text and are parsed here.

use crate::error::AppError;
use crate::extractors::caller::Admin;
use crate::handlers::parse_id;
use crate::model::{AccountId, CustomerId};
use crate::money::parse_amount;
use crate::response::{respond, respond_list};
use crate::service::AccountService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub customer_id: CustomerId,
    pub account_type: String,
    /// Blank or absent means zero.
    #[serde(default)]
    pub initial_balance: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAccountRequest {
    pub account_type: String,
    pub balance: String,
}

/// GET /accounts, optionally `?customer_id=N`.
pub async fn list(
    _admin: Admin,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = match params.get("customer_id") {
        Some(v) => AccountService::list_for_customer(&state.store, CustomerId(parse_id(v)?)).await?,
        None => AccountService::list(&state.store).await?,
    };
    Ok(respond_list(rows))
}

pub async fn create(
    _admin: Admin,
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let initial = parse_amount(body.initial_balance.as_deref().unwrap_or(""))?;
    let id = AccountService::create(&state.store, body.customer_id, &body.account_type, initial).await?;
    let account = AccountService::get(&state.store, id).await?;
    Ok(respond(StatusCode::CREATED, account))
}

pub async fn read(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = AccountId(parse_id(&id_str)?);
    let account = AccountService::get(&state.store, id).await?;
    Ok(respond(StatusCode::OK, account))
}

pub async fn update(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<UpdateAccountRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = AccountId(parse_id(&id_str)?);
    let balance = parse_amount(&body.balance)?;
    AccountService::update(&state.store, id, &body.account_type, balance).await?;
    let account = AccountService::get(&state.store, id).await?;
    Ok(respond(StatusCode::OK, account))
}

pub async fn delete(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = AccountId(parse_id(&id_str)?);
    AccountService::delete(&state.store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reconcile(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = AccountId(parse_id(&id_str)?);
    let report = AccountService::reconcile(&state.store, id).await?;
    Ok(respond(StatusCode::OK, report))
}
