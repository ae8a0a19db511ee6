//! Customer records. Deleting a customer cascades to its accounts, transactions and credentials.

use crate::error::LedgerError;
use crate::model::{AccountId, Customer, CustomerId};
use crate::service::validation::RequestValidator;
use crate::store::Store;
use serde::Deserialize;

/// Customer form input. Blank optional fields are stored as NULL.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerInput {
    pub fn new(name: impl Into<String>) -> Self {
        CustomerInput {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

pub struct CustomerService;

impl CustomerService {
    pub async fn create(store: &Store, input: &CustomerInput) -> Result<CustomerId, LedgerError> {
        let c = RequestValidator::customer(&input.name, input.email.as_deref(), input.phone.as_deref())?;
        let id = sqlx::query("INSERT INTO customers (name, email, phone) VALUES (?, ?, ?)")
            .bind(&c.name)
            .bind(&c.email)
            .bind(&c.phone)
            .execute(store.pool())
            .await?
            .last_insert_rowid();
        tracing::info!(customer_id = id, "customer created");
        Ok(CustomerId(id))
    }

    pub async fn update(store: &Store, id: CustomerId, input: &CustomerInput) -> Result<(), LedgerError> {
        let c = RequestValidator::customer(&input.name, input.email.as_deref(), input.phone.as_deref())?;
        let result = sqlx::query("UPDATE customers SET name = ?, email = ?, phone = ? WHERE id = ?")
            .bind(&c.name)
            .bind(&c.email)
            .bind(&c.phone)
            .bind(id)
            .execute(store.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("customer", id));
        }
        tracing::info!(customer_id = %id, "customer updated");
        Ok(())
    }

    /// Irreversible. Accounts, their transactions and the customer's credentials go with it.
    ///
    /// The transaction opens with a write so it holds the SQLite write lock from its first
    /// statement and never has to upgrade from a read lock.
    pub async fn delete(store: &Store, id: CustomerId) -> Result<(), LedgerError> {
        let mut tx = store.pool().begin().await?;
        let account_ids: Vec<AccountId> = sqlx::query_scalar("DELETE FROM accounts WHERE customer_id = ? RETURNING id")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("customer", id));
        }
        tx.commit().await?;
        for account_id in &account_ids {
            store.forget_account(*account_id);
        }
        tracing::info!(customer_id = %id, accounts = account_ids.len(), "customer deleted");
        Ok(())
    }

    pub async fn get(store: &Store, id: CustomerId) -> Result<Customer, LedgerError> {
        sqlx::query_as::<_, Customer>("SELECT id, name, email, phone FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(store.pool())
            .await?
            .ok_or_else(|| LedgerError::not_found("customer", id))
    }

    /// All customers in id order.
    pub async fn list(store: &Store) -> Result<Vec<Customer>, LedgerError> {
        let rows = sqlx::query_as::<_, Customer>("SELECT id, name, email, phone FROM customers ORDER BY id")
            .fetch_all(store.pool())
            .await?;
        Ok(rows)
    }

    pub(crate) async fn exists(store: &Store, id: CustomerId) -> Result<bool, LedgerError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(store.pool())
            .await?;
        Ok(found.is_some())
    }
}
