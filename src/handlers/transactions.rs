//! Transaction handlers (admin only): list and post.

use crate::error::AppError;
use crate::extractors::caller::Admin;
use crate::model::{AccountId, TransactionKind};
use crate::money::parse_positive_amount;
use crate::response::{respond, respond_list};
use crate::service::TransactionService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct PostTransactionRequest {
    pub account_id: AccountId,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

pub async fn list(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = TransactionService::list(&state.store).await?;
    Ok(respond_list(rows))
}

pub async fn post(
    _admin: Admin,
    State(state): State<AppState>,
    Json(body): Json<PostTransactionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let kind: TransactionKind = body.kind.parse()?;
    let amount = parse_positive_amount(&body.amount)?;
    let posting = match body.date {
        Some(date) => TransactionService::post_on(&state.store, body.account_id, kind, amount, date).await?,
        None => TransactionService::post(&state.store, body.account_id, kind, amount).await?,
    };
    Ok(respond(StatusCode::CREATED, posting))
}
