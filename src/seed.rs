//! Demo data for a fresh database. Customers, accounts and credentials go through the normal
//! ledger operations; transactions are written in one bulk database transaction that keeps every
//! account's balance equal to its opening balance plus its history.

use crate::auth::{AuthService, NewCredential};
use crate::error::LedgerError;
use crate::model::{AccountId, CustomerId, Role, TransactionKind};
use crate::money::from_cents;
use crate::service::{AccountService, CustomerInput, CustomerService};
use crate::store::Store;
use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::ops::RangeInclusive;

pub const DEMO_PASSWORD: &str = "password123";
const ACCOUNT_TYPES: &[&str] = &["Savings", "Checking", "Business"];
const FIRST_NAMES: &[&str] = &[
    "Ana", "Ben", "Carla", "David", "Elena", "Farid", "Grace", "Hugo", "Ines", "Jonas", "Kira", "Liam", "Maya",
    "Noah", "Olga", "Pedro", "Quinn", "Rosa", "Samir", "Tara",
];
const LAST_NAMES: &[&str] = &[
    "Lee", "Novak", "Silva", "Okafor", "Meyer", "Haddad", "Kim", "Rossi", "Dubois", "Larsen", "Moreau", "Tanaka",
];

#[derive(Clone, Debug)]
pub struct SeedOptions {
    pub customers: usize,
    pub accounts_per_customer: RangeInclusive<usize>,
    pub transactions_per_account: RangeInclusive<usize>,
    /// Opening balances, in cents.
    pub opening_balance_cents: RangeInclusive<i64>,
    /// Transaction amounts, in cents.
    pub amount_cents: RangeInclusive<i64>,
    /// How far back transaction dates may go.
    pub history_days: u64,
    /// Fixed seed for reproducible data; random when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        SeedOptions {
            customers: 50,
            accounts_per_customer: 1..=3,
            transactions_per_account: 5..=30,
            opening_balance_cents: 50_000..=7_500_000,
            amount_cents: 2_000..=150_000,
            history_days: 730,
            rng_seed: None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SampleLogin {
    pub username: String,
    pub password: String,
    pub name: String,
    pub customer_id: CustomerId,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SeedReport {
    pub customers: usize,
    pub accounts: usize,
    pub transactions: usize,
    /// Generated withdrawals dropped because they would have overdrawn the account.
    pub skipped_withdrawals: usize,
    pub sample_logins: Vec<SampleLogin>,
}

/// Remove all customers (and by cascade their accounts, transactions and credentials) and every
/// non-admin credential. Admin logins survive.
pub async fn clear_data(store: &Store) -> Result<(), LedgerError> {
    let mut tx = store.pool().begin().await?;
    sqlx::query("DELETE FROM transactions").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM accounts").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM customers").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM credentials WHERE role != 'admin'")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    tracing::info!("cleared ledger data");
    Ok(())
}

pub async fn populate(store: &Store, opts: &SeedOptions) -> Result<SeedReport, LedgerError> {
    let mut rng = match opts.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut report = SeedReport::default();
    let mut accounts: Vec<(AccountId, i64)> = Vec::new();

    for n in 0..opts.customers {
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Ana");
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Lee");
        let name = format!("{} {}", first, last);
        let input = CustomerInput::new(name.clone())
            .email(format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), n))
            .phone(format!(
                "+1 555 {:03} {:04}",
                rng.gen_range(0..1000),
                rng.gen_range(0..10000)
            ));
        let customer_id = CustomerService::create(store, &input).await?;
        report.customers += 1;

        let username = format!("{}{}", name.to_lowercase().replace(' ', ""), customer_id);
        AuthService::create_credential(
            store,
            &NewCredential {
                username: username.clone(),
                password: DEMO_PASSWORD.into(),
                role: Role::Customer,
                customer_id: Some(customer_id),
            },
        )
        .await?;
        if report.sample_logins.len() < 10 {
            report.sample_logins.push(SampleLogin {
                username,
                password: DEMO_PASSWORD.into(),
                name,
                customer_id,
            });
        }

        for _ in 0..rng.gen_range(opts.accounts_per_customer.clone()) {
            let account_type = ACCOUNT_TYPES.choose(&mut rng).copied().unwrap_or("Savings");
            let opening = rng.gen_range(opts.opening_balance_cents.clone());
            let id = AccountService::create(store, customer_id, account_type, from_cents(opening)).await?;
            accounts.push((id, opening));
            report.accounts += 1;
        }
    }

    let today = Local::now().date_naive();
    let mut tx = store.pool().begin().await?;
    for (account_id, opening) in accounts {
        let mut history: Vec<(NaiveDate, TransactionKind, i64)> = (0..rng
            .gen_range(opts.transactions_per_account.clone()))
            .map(|_| {
                let kind = if rng.gen_bool(0.5) {
                    TransactionKind::Deposit
                } else {
                    TransactionKind::Withdraw
                };
                let back = rng.gen_range(0..=opts.history_days);
                let date = today.checked_sub_days(Days::new(back)).unwrap_or(today);
                (date, kind, rng.gen_range(opts.amount_cents.clone()))
            })
            .collect();
        history.sort_by_key(|(date, _, _)| *date);

        let mut balance = opening;
        for (date, kind, amount) in history {
            match kind {
                TransactionKind::Deposit => balance += amount,
                TransactionKind::Withdraw if amount <= balance => balance -= amount,
                TransactionKind::Withdraw => {
                    report.skipped_withdrawals += 1;
                    continue;
                }
            }
            sqlx::query("INSERT INTO transactions (account_id, type, amount, date) VALUES (?, ?, ?, ?)")
                .bind(account_id)
                .bind(kind.as_str())
                .bind(amount)
                .bind(date)
                .execute(&mut *tx)
                .await?;
            report.transactions += 1;
        }
        sqlx::query("UPDATE accounts SET balance = ? WHERE id = ?")
            .bind(balance)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(
        customers = report.customers,
        accounts = report.accounts,
        transactions = report.transactions,
        "seeded demo data"
    );
    Ok(report)
}
