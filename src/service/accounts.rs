//! Accounts: creation against an existing customer, administrative overrides, reconciliation.

use crate::error::LedgerError;
use crate::model::{Account, AccountId, AccountRow, CustomerId};
use crate::money::{from_cents, to_cents};
use crate::service::customers::CustomerService;
use crate::service::validation::RequestValidator;
use crate::store::Store;
use rust_decimal::Decimal;
use serde::Serialize;

const SELECT_ACCOUNT: &str = "SELECT id, customer_id, account_type, balance, opening_balance FROM accounts";

/// Net effect of an account's transactions in cents (deposits minus withdrawals).
const NET_TRANSACTIONS: &str = "SELECT COALESCE(SUM(CASE type WHEN 'deposit' THEN amount ELSE -amount END), 0) \
     FROM transactions WHERE account_id = accounts.id";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub account_id: AccountId,
    pub stored_balance: Decimal,
    pub expected_balance: Decimal,
    pub transaction_count: i64,
    pub consistent: bool,
}

pub struct AccountService;

impl AccountService {
    /// Open an account. The initial balance is the account's starting point, not a transaction.
    pub async fn create(
        store: &Store,
        customer_id: CustomerId,
        account_type: &str,
        initial_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        let account_type = RequestValidator::account_type(account_type)?;
        if initial_balance.is_sign_negative() && !initial_balance.is_zero() {
            return Err(LedgerError::Validation("initial balance must not be negative".into()));
        }
        let cents = to_cents(initial_balance)?;
        if !CustomerService::exists(store, customer_id).await? {
            return Err(LedgerError::Validation(format!("unknown customer: {}", customer_id)));
        }
        let id = sqlx::query(
            "INSERT INTO accounts (customer_id, account_type, balance, opening_balance) VALUES (?, ?, ?, ?)",
        )
        .bind(customer_id)
        .bind(&account_type)
        .bind(cents)
        .bind(cents)
        .execute(store.pool())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                LedgerError::Validation(format!("unknown customer: {}", customer_id))
            }
            _ => LedgerError::Storage(e),
        })?
        .last_insert_rowid();
        tracing::info!(account_id = id, customer_id = %customer_id, "account created");
        Ok(AccountId(id))
    }

    /// Administrative override of type and balance. Not a ledger event: the opening balance is
    /// re-based in the same statement so reconciliation keeps holding.
    pub async fn update(
        store: &Store,
        id: AccountId,
        account_type: &str,
        balance: Decimal,
    ) -> Result<(), LedgerError> {
        let account_type = RequestValidator::account_type(account_type)?;
        if balance.is_sign_negative() && !balance.is_zero() {
            return Err(LedgerError::Validation("balance must not be negative".into()));
        }
        let cents = to_cents(balance)?;
        let guard = store.lock_account(id).await;
        let sql = format!(
            "UPDATE accounts SET account_type = ?, balance = ?, opening_balance = ? - ({}) WHERE id = ?",
            NET_TRANSACTIONS
        );
        let result = sqlx::query(&sql)
            .bind(&account_type)
            .bind(cents)
            .bind(cents)
            .bind(id)
            .execute(store.pool())
            .await?;
        drop(guard);
        if result.rows_affected() == 0 {
            store.forget_account(id);
            return Err(LedgerError::not_found("account", id));
        }
        tracing::info!(account_id = %id, balance = %balance, "account overridden");
        Ok(())
    }

    /// Irreversible; the account's transactions are removed with it.
    pub async fn delete(store: &Store, id: AccountId) -> Result<(), LedgerError> {
        let guard = store.lock_account(id).await;
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(store.pool())
            .await?;
        drop(guard);
        store.forget_account(id);
        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("account", id));
        }
        tracing::info!(account_id = %id, "account deleted");
        Ok(())
    }

    pub async fn get(store: &Store, id: AccountId) -> Result<Account, LedgerError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{} WHERE id = ?", SELECT_ACCOUNT))
            .bind(id)
            .fetch_optional(store.pool())
            .await?
            .ok_or_else(|| LedgerError::not_found("account", id))?;
        Ok(row.into())
    }

    /// All accounts in id order.
    pub async fn list(store: &Store) -> Result<Vec<Account>, LedgerError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!("{} ORDER BY id", SELECT_ACCOUNT))
            .fetch_all(store.pool())
            .await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    pub async fn list_for_customer(store: &Store, customer_id: CustomerId) -> Result<Vec<Account>, LedgerError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!("{} WHERE customer_id = ? ORDER BY id", SELECT_ACCOUNT))
            .bind(customer_id)
            .fetch_all(store.pool())
            .await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Compare the stored balance with opening balance plus the net of all postings.
    pub async fn reconcile(store: &Store, id: AccountId) -> Result<Reconciliation, LedgerError> {
        let sql = format!(
            "SELECT balance, opening_balance + ({}), \
             (SELECT COUNT(*) FROM transactions WHERE account_id = accounts.id) \
             FROM accounts WHERE id = ?",
            NET_TRANSACTIONS
        );
        let (stored, expected, transaction_count): (i64, i64, i64) = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(store.pool())
            .await?
            .ok_or_else(|| LedgerError::not_found("account", id))?;
        if stored != expected {
            tracing::warn!(account_id = %id, stored, expected, "account balance does not reconcile");
        }
        Ok(Reconciliation {
            account_id: id,
            stored_balance: from_cents(stored),
            expected_balance: from_cents(expected),
            transaction_count,
            consistent: stored == expected,
        })
    }
}
