//! Transaction posting: the balance change and the transaction row commit together or not at all.

use crate::error::LedgerError;
use crate::model::{AccountId, Transaction, TransactionId, TransactionKind, TransactionRow};
use crate::money::{from_cents, to_cents};
use crate::store::Store;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

const SELECT_TRANSACTION: &str = "SELECT id, account_id, type, amount, date FROM transactions";
/// Most recent first; same-day postings by id.
const RECENT_FIRST: &str = "ORDER BY date DESC, id DESC";

/// Result of a successful posting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub transaction_id: TransactionId,
    pub new_balance: Decimal,
}

pub struct TransactionService;

impl TransactionService {
    /// Post dated today (local calendar).
    pub async fn post(
        store: &Store,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<Posting, LedgerError> {
        Self::post_on(store, account_id, kind, amount, Local::now().date_naive()).await
    }

    /// Post a deposit or withdrawal. Withdrawals never take the balance below zero.
    ///
    /// Postings to one account are serialized in-process, and the funds check is part of the
    /// balance `UPDATE` itself, so a stale balance can never pass it.
    pub async fn post_on(
        store: &Store,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<Posting, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::Validation("amount must be a positive number".into()));
        }
        let cents = to_cents(amount)?;

        let guard = store.lock_account(account_id).await;
        let mut tx = store.pool().begin().await?;

        // Both updates are conditional: deposits may not push the balance past what an INTEGER
        // column holds, withdrawals may not take it below zero.
        let new_balance: Option<i64> = match kind {
            TransactionKind::Deposit => {
                sqlx::query_scalar(
                    "UPDATE accounts SET balance = balance + ? WHERE id = ? AND balance <= ? RETURNING balance",
                )
                .bind(cents)
                .bind(account_id)
                .bind(i64::MAX - cents)
                .fetch_optional(&mut *tx)
                .await?
            }
            TransactionKind::Withdraw => {
                sqlx::query_scalar(
                    "UPDATE accounts SET balance = balance - ? WHERE id = ? AND balance >= ? RETURNING balance",
                )
                .bind(cents)
                .bind(account_id)
                .bind(cents)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some(new_balance) = new_balance else {
            let balance: Option<i64> = sqlx::query_scalar("SELECT balance FROM accounts WHERE id = ?")
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await?;
            drop(tx);
            drop(guard);
            return Err(match (balance, kind) {
                (None, _) => {
                    store.forget_account(account_id);
                    LedgerError::not_found("account", account_id)
                }
                (Some(_), TransactionKind::Deposit) => LedgerError::Validation(format!(
                    "deposit of {} would exceed the maximum account balance",
                    amount
                )),
                (Some(balance), TransactionKind::Withdraw) => {
                    tracing::warn!(account_id = %account_id, balance, requested = cents, "withdrawal rejected");
                    LedgerError::InsufficientFunds {
                        account_id: account_id.0,
                        balance: from_cents(balance),
                        requested: amount,
                    }
                }
            });
        };

        let id = sqlx::query("INSERT INTO transactions (account_id, type, amount, date) VALUES (?, ?, ?, ?)")
            .bind(account_id)
            .bind(kind.as_str())
            .bind(cents)
            .bind(date)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        tx.commit().await?;
        drop(guard);

        let new_balance = from_cents(new_balance);
        tracing::info!(
            account_id = %account_id,
            transaction_id = id,
            kind = kind.as_str(),
            amount = %amount,
            new_balance = %new_balance,
            "transaction posted"
        );
        Ok(Posting {
            transaction_id: TransactionId(id),
            new_balance,
        })
    }

    pub async fn list(store: &Store) -> Result<Vec<Transaction>, LedgerError> {
        let sql = format!("{} {}", SELECT_TRANSACTION, RECENT_FIRST);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, TransactionRow>(&sql)
            .fetch_all(store.pool())
            .await?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Transactions of the given accounts only. An empty set yields nothing.
    pub async fn list_for_accounts(store: &Store, account_ids: &[AccountId]) -> Result<Vec<Transaction>, LedgerError> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; account_ids.len()].join(", ");
        let sql = format!(
            "{} WHERE account_id IN ({}) {}",
            SELECT_TRANSACTION, placeholders, RECENT_FIRST
        );
        tracing::debug!(sql = %sql, params = ?account_ids, "query");
        let mut query = sqlx::query_as::<_, TransactionRow>(&sql);
        for id in account_ids {
            query = query.bind(*id);
        }
        let rows = query.fetch_all(store.pool()).await?;
        rows.into_iter().map(Transaction::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ensure_tables, Store};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn missing_account_leaves_no_lock_behind() {
        let store = Store::in_memory().await.unwrap();
        ensure_tables(&store).await.unwrap();
        for id in 100..110 {
            let err = TransactionService::post(&store, AccountId(id), TransactionKind::Deposit, dec!(1.00))
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::NotFound { .. }));
        }
        assert_eq!(store.tracked_account_locks(), 0);
    }
}
