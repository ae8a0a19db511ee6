//! HTTP handlers: a thin shell that converts request text into typed ledger calls.

pub mod accounts;
pub mod auth;
pub mod credentials;
pub mod customers;
pub mod transactions;
pub mod views;

use crate::error::AppError;

/// Parse a path id segment; non-numeric ids are a bad request rather than a miss.
pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}
