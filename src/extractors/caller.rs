//! Authenticate every request from credential headers. There are no sessions: each request
//! carries the username/password pair and is checked again.

use crate::auth::{AuthResult, AuthService};
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const USERNAME_HEADER: &str = "X-Ledger-Username";
pub const PASSWORD_HEADER: &str = "X-Ledger-Password";

/// Any authenticated caller.
#[derive(Clone, Copy, Debug)]
pub struct Caller(pub AuthResult);

/// Caller holding the admin role; others get 403.
#[derive(Clone, Copy, Debug)]
pub struct Admin(pub AuthResult);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (Some(username), Some(password)) = (header(parts, USERNAME_HEADER), header(parts, PASSWORD_HEADER)) else {
            return Err(AppError::Unauthorized(format!(
                "{} and {} headers are required",
                USERNAME_HEADER, PASSWORD_HEADER
            )));
        };
        let auth = AuthService::authenticate(&state.store, username, password).await?;
        Ok(Caller(auth))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Caller(auth) = Caller::from_request_parts(parts, state).await?;
        if !auth.is_admin() {
            return Err(AppError::Forbidden("admin role required".into()));
        }
        Ok(Admin(auth))
    }
}
