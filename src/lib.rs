//! Bank ledger: customers, accounts and atomic deposit/withdrawal posting over SQLite,
//! with role-gated access and an HTTP API.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod money;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;

pub use auth::{AuthResult, AuthService, NewCredential};
pub use config::LedgerConfig;
pub use error::{AppError, ConfigError, LedgerError};
pub use model::{Account, AccountId, Customer, CustomerId, Role, Transaction, TransactionId, TransactionKind};
pub use response::{respond, respond_list};
pub use routes::{app, ledger_routes, status_routes};
pub use service::{
    AccountService, AdminView, CustomerInput, CustomerService, CustomerView, Posting, Reconciliation,
    TransactionService, ViewService,
};
pub use state::AppState;
pub use store::{ensure_tables, seed_admin, Store};
