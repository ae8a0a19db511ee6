//! SQLite pool lifecycle, table DDL and the seeded admin credential.
//!
//! Referential integrity lives in the schema: deleting a customer removes its accounts and
//! credentials, deleting an account removes its transactions (`ON DELETE CASCADE`).

use crate::auth::PasswordDigest;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::model::AccountId;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(trim(name)) > 0),
        email TEXT,
        phone TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
        account_type TEXT NOT NULL,
        balance INTEGER NOT NULL DEFAULT 0,
        opening_balance INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        type TEXT NOT NULL CHECK (type IN ('deposit', 'withdraw')),
        amount INTEGER NOT NULL CHECK (amount > 0),
        date TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS credentials (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        password_salt TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('admin', 'customer')),
        customer_id INTEGER REFERENCES customers(id) ON DELETE CASCADE,
        CHECK ((role = 'admin' AND customer_id IS NULL) OR (role = 'customer' AND customer_id IS NOT NULL))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_accounts_customer ON accounts (customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions (account_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_recent ON transactions (date DESC, id DESC)",
    "CREATE INDEX IF NOT EXISTS idx_credentials_customer ON credentials (customer_id)",
];

/// Explicitly passed storage handle. Cheap to clone; all clones share the pool and posting locks.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    posting_locks: PostingLocks,
}

impl Store {
    /// Open (creating the file if needed) the database named in the config.
    pub async fn connect(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let opts = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(opts)
            .await?;
        tracing::info!(url = %config.database_url, "connected to ledger database");
        Ok(Self::from_pool(pool))
    }

    /// Private in-memory database. One connection that never expires, so the data lives as long as the store.
    pub async fn in_memory() -> Result<Self, LedgerError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Store {
            pool,
            posting_locks: PostingLocks::default(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Connect, create tables and seed the admin credential.
    pub async fn open(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let store = Self::connect(config).await?;
        ensure_tables(&store).await?;
        seed_admin(&store).await?;
        Ok(store)
    }

    /// Round-trip a trivial query; fails when the database cannot be reached.
    pub async fn ping(&self) -> Result<(), LedgerError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("ledger database closed");
    }

    pub(crate) async fn lock_account(&self, id: AccountId) -> OwnedMutexGuard<()> {
        self.posting_locks.acquire(id).await
    }

    pub(crate) fn forget_account(&self, id: AccountId) {
        self.posting_locks.remove(id);
    }

    #[cfg(test)]
    pub(crate) fn tracked_account_locks(&self) -> usize {
        self.posting_locks.len()
    }
}

/// One async mutex per account so postings against the same account run one at a time.
#[derive(Clone, Default)]
struct PostingLocks {
    by_account: Arc<Mutex<HashMap<AccountId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl PostingLocks {
    async fn acquire(&self, id: AccountId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.by_account.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            map.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    fn remove(&self, id: AccountId) {
        let mut map = self.by_account.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.remove(&id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.by_account.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

/// Create the ledger tables and indexes if absent. Safe to call repeatedly.
pub async fn ensure_tables(store: &Store) -> Result<(), LedgerError> {
    let mut tx = store.pool().begin().await?;
    for ddl in TABLES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Insert the `admin`/`admin` credential unless that username already exists.
pub async fn seed_admin(store: &Store) -> Result<(), LedgerError> {
    let digest = PasswordDigest::generate(ADMIN_PASSWORD);
    let inserted = sqlx::query(
        "INSERT INTO credentials (username, password_hash, password_salt, role, customer_id) \
         VALUES (?, ?, ?, 'admin', NULL) ON CONFLICT (username) DO NOTHING",
    )
    .bind(ADMIN_USERNAME)
    .bind(&digest.hash)
    .bind(&digest.salt)
    .execute(store.pool())
    .await?
    .rows_affected();
    if inserted > 0 {
        tracing::info!(username = ADMIN_USERNAME, "seeded admin credential");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_tables_and_seed_are_idempotent() {
        let store = Store::in_memory().await.unwrap();
        for _ in 0..3 {
            ensure_tables(&store).await.unwrap();
            seed_admin(&store).await.unwrap();
        }
        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM credentials WHERE role = 'admin'")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[tokio::test]
    async fn customer_role_requires_customer_id() {
        let store = Store::in_memory().await.unwrap();
        ensure_tables(&store).await.unwrap();
        let res = sqlx::query(
            "INSERT INTO credentials (username, password_hash, password_salt, role) VALUES ('x', 'h', 's', 'customer')",
        )
        .execute(store.pool())
        .await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn ping_fails_once_closed() {
        let store = Store::in_memory().await.unwrap();
        store.ping().await.unwrap();
        store.close().await;
        assert!(store.ping().await.is_err());
    }
}
