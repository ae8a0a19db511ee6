//! Ledger core: customer, account and transaction operations plus read projections.

mod accounts;
mod customers;
mod transactions;
mod validation;
mod views;
pub use accounts::{AccountService, Reconciliation};
pub use customers::{CustomerInput, CustomerService};
pub use transactions::{Posting, TransactionService};
pub use validation::{CleanCustomer, RequestValidator};
pub use views::{AdminView, CustomerView, ViewService};
