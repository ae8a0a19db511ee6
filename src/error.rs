//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Errors raised by ledger operations. Every variant is recoverable by the caller.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account_id: i64,
        balance: Decimal,
        requested: Decimal,
    },
    /// Same message whether the username or the password was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage: {0}")]
    Storage(#[from] sqlx::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Map unique-constraint failures to `Conflict`; everything else stays `Storage`.
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                LedgerError::Conflict(format!("{} already exists", what))
            }
            _ => LedgerError::Storage(err),
        }
    }
}

/// Errors surfaced by the HTTP shell.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Ledger(e) => match e {
                LedgerError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
                LedgerError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                LedgerError::InsufficientFunds { .. } => (StatusCode::CONFLICT, "insufficient_funds"),
                LedgerError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
                LedgerError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                LedgerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            },
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let details = match &self {
            AppError::Ledger(LedgerError::InsufficientFunds { balance, requested, .. }) => Some(serde_json::json!({
                "balance": balance.to_string(),
                "requested": requested.to_string(),
            })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
