//! Identity & access: credentials, password digests, and the role each login resolves to.

use crate::error::LedgerError;
use crate::model::{CredentialInfo, CustomerId, Role};
use crate::service::CustomerService;
use crate::store::Store;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Outcome of a successful login. `customer_id` is set exactly when `role` is `Customer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AuthResult {
    pub role: Role,
    pub customer_id: Option<CustomerId>,
}

impl AuthResult {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCredential {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
}

/// Salted SHA-256 of a password, both parts hex encoded.
#[derive(Clone, Debug)]
pub struct PasswordDigest {
    pub hash: String,
    pub salt: String,
}

impl PasswordDigest {
    pub fn generate(password: &str) -> Self {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let hash = digest(&salt, password);
        PasswordDigest { hash, salt }
    }

    pub fn matches(&self, password: &str) -> bool {
        constant_time_eq(self.hash.as_bytes(), digest(&self.salt, password).as_bytes())
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub struct AuthService;

impl AuthService {
    /// Exact username lookup, then password check. Both failure paths return `InvalidCredentials`.
    pub async fn authenticate(store: &Store, username: &str, password: &str) -> Result<AuthResult, LedgerError> {
        let row: Option<(String, String, String, Option<CustomerId>)> = sqlx::query_as(
            "SELECT password_hash, password_salt, role, customer_id FROM credentials WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(store.pool())
        .await?;

        let Some((hash, salt, role, customer_id)) = row else {
            // Hash anyway so unknown usernames cost the same as wrong passwords.
            let _ = digest("", password);
            tracing::warn!(username = %username, "login rejected");
            return Err(LedgerError::InvalidCredentials);
        };
        if !(PasswordDigest { hash, salt }).matches(password) {
            tracing::warn!(username = %username, "login rejected");
            return Err(LedgerError::InvalidCredentials);
        }
        let role: Role = role.parse()?;
        tracing::info!(username = %username, role = role.as_str(), "login accepted");
        Ok(AuthResult { role, customer_id })
    }

    pub async fn create_credential(store: &Store, new: &NewCredential) -> Result<(), LedgerError> {
        let username = new.username.trim();
        if username.is_empty() {
            return Err(LedgerError::Validation("username is required".into()));
        }
        if new.password.is_empty() {
            return Err(LedgerError::Validation("password is required".into()));
        }
        match (new.role, new.customer_id) {
            (Role::Admin, Some(_)) => {
                return Err(LedgerError::Validation("admin credentials cannot be bound to a customer".into()))
            }
            (Role::Customer, None) => {
                return Err(LedgerError::Validation("customer credentials require customer_id".into()))
            }
            (Role::Customer, Some(id)) => {
                if !CustomerService::exists(store, id).await? {
                    return Err(LedgerError::Validation(format!("unknown customer: {}", id)));
                }
            }
            (Role::Admin, None) => {}
        }

        let digest = PasswordDigest::generate(&new.password);
        sqlx::query(
            "INSERT INTO credentials (username, password_hash, password_salt, role, customer_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(&digest.hash)
        .bind(&digest.salt)
        .bind(new.role.as_str())
        .bind(new.customer_id)
        .execute(store.pool())
        .await
        .map_err(|e| LedgerError::from_write(e, &format!("username '{}'", username)))?;
        tracing::info!(username = %username, role = new.role.as_str(), "credential created");
        Ok(())
    }

    /// Remove a credential. The last admin credential cannot be removed.
    ///
    /// The last-admin guard is part of the `DELETE` itself, so two concurrent admin removals
    /// cannot both pass it.
    pub async fn delete_credential(store: &Store, username: &str) -> Result<(), LedgerError> {
        let deleted = sqlx::query(
            "DELETE FROM credentials WHERE username = ? \
             AND (role <> 'admin' OR (SELECT COUNT(*) FROM credentials WHERE role = 'admin') > 1)",
        )
        .bind(username)
        .execute(store.pool())
        .await?
        .rows_affected();
        if deleted == 0 {
            let role: Option<String> = sqlx::query_scalar("SELECT role FROM credentials WHERE username = ?")
                .bind(username)
                .fetch_optional(store.pool())
                .await?;
            return Err(match role {
                None => LedgerError::not_found("credential", username),
                Some(_) => LedgerError::Validation("cannot delete the last admin credential".into()),
            });
        }
        tracing::info!(username = %username, "credential deleted");
        Ok(())
    }

    pub async fn list_credentials(store: &Store) -> Result<Vec<CredentialInfo>, LedgerError> {
        let rows: Vec<(String, String, Option<CustomerId>)> =
            sqlx::query_as("SELECT username, role, customer_id FROM credentials ORDER BY id")
                .fetch_all(store.pool())
                .await?;
        rows.into_iter()
            .map(|(username, role, customer_id)| {
                Ok(CredentialInfo {
                    username,
                    role: role.parse()?,
                    customer_id,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_role_is_admin() {
        let admin = AuthResult { role: Role::Admin, customer_id: None };
        let customer = AuthResult { role: Role::Customer, customer_id: Some(CustomerId(3)) };
        assert!(admin.is_admin());
        assert!(!customer.is_admin());
    }

    #[test]
    fn digest_is_salted_and_verifiable() {
        let a = PasswordDigest::generate("secret");
        let b = PasswordDigest::generate("secret");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
        assert!(a.matches("secret"));
        assert!(!a.matches("Secret"));
        assert!(!a.matches(""));
    }

    #[test]
    fn constant_time_eq_checks_length() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
