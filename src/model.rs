//! Ledger records and the identifiers that tie them together.

use crate::error::LedgerError;
use crate::money::from_cents;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(CustomerId);
id_type!(AccountId);
id_type!(TransactionId);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub account_type: String,
    pub balance: Decimal,
    /// Base of the running balance: `balance == opening_balance + net(transactions)`.
    pub opening_balance: Decimal,
}

/// Storage shape of `accounts`; money columns hold cents.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AccountRow {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub account_type: String,
    pub balance: i64,
    pub opening_balance: i64,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            customer_id: row.customer_id,
            account_type: row.account_type,
            balance: from_cents(row.balance),
            opening_balance: from_cents(row.opening_balance),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" => Ok(TransactionKind::Withdraw),
            other => Err(LedgerError::Validation(format!(
                "invalid transaction type: {} (expected deposit or withdraw)",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl Transaction {
    /// Effect on the owning account's balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Withdraw => -self.amount,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TransactionRow {
    pub id: TransactionId,
    pub account_id: AccountId,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub amount: i64,
    pub date: NaiveDate,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: row.id,
            account_id: row.account_id,
            kind: row.kind.parse()?,
            amount: from_cents(row.amount),
            date: row.date,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            other => Err(LedgerError::Validation(format!(
                "invalid role: {} (expected admin or customer)",
                other
            ))),
        }
    }
}

/// Credential as listed to administrators. Secrets never leave the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CredentialInfo {
    pub username: String,
    pub role: Role,
    pub customer_id: Option<CustomerId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn transaction_kind_parses_case_insensitively() {
        assert_eq!(" Deposit ".parse::<TransactionKind>().unwrap(), TransactionKind::Deposit);
        assert_eq!("WITHDRAW".parse::<TransactionKind>().unwrap(), TransactionKind::Withdraw);
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn withdrawals_count_negative() {
        let tx = Transaction {
            id: TransactionId(1),
            account_id: AccountId(1),
            kind: TransactionKind::Withdraw,
            amount: dec!(12.50),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        assert_eq!(tx.signed_amount(), dec!(-12.50));
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "withdraw");
        assert_eq!(json["amount"], "12.50");
    }
}
