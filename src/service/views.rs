//! Read projections for the two roles.

use crate::error::LedgerError;
use crate::model::{Account, AccountId, Customer, CustomerId, Transaction};
use crate::service::{AccountService, CustomerService, TransactionService};
use crate::store::Store;
use serde::Serialize;

/// One customer's own data: never includes another customer's accounts or transactions.
#[derive(Clone, Debug, Serialize)]
pub struct CustomerView {
    pub customer: Customer,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdminView {
    pub customers: Vec<Customer>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

pub struct ViewService;

impl ViewService {
    pub async fn customer_view(store: &Store, customer_id: CustomerId) -> Result<CustomerView, LedgerError> {
        let customer = CustomerService::get(store, customer_id).await?;
        let accounts = AccountService::list_for_customer(store, customer_id).await?;
        let ids: Vec<AccountId> = accounts.iter().map(|a| a.id).collect();
        let transactions = TransactionService::list_for_accounts(store, &ids).await?;
        Ok(CustomerView {
            customer,
            accounts,
            transactions,
        })
    }

    pub async fn admin_view(store: &Store) -> Result<AdminView, LedgerError> {
        Ok(AdminView {
            customers: CustomerService::list(store).await?,
            accounts: AccountService::list(store).await?,
            transactions: TransactionService::list(store).await?,
        })
    }
}
