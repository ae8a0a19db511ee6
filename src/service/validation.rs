//! Field validation for customer and account input.

use crate::error::LedgerError;
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$";
/// 10-15 characters of digits, spaces, dots or dashes, with an optional leading `+`.
const PHONE_PATTERN: &str = r"^\+?[0-9\s.-]{10,15}$";

fn pattern_matches(field: &str, pattern: &str, value: &str) -> Result<bool, LedgerError> {
    let re = Regex::new(pattern).map_err(|_| LedgerError::Validation(format!("invalid pattern for {}", field)))?;
    Ok(re.is_match(value))
}

/// Customer fields after trimming; blank optional fields become `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct RequestValidator;

impl RequestValidator {
    pub fn customer(name: &str, email: Option<&str>, phone: Option<&str>) -> Result<CleanCustomer, LedgerError> {
        let name = required("name", name)?;
        let email = optional(email);
        let phone = optional(phone);
        if let Some(ref e) = email {
            if !pattern_matches("email", EMAIL_PATTERN, e)? {
                return Err(LedgerError::Validation(format!("invalid email format: {}", e)));
            }
        }
        if let Some(ref p) = phone {
            if !pattern_matches("phone", PHONE_PATTERN, p)? {
                return Err(LedgerError::Validation(format!(
                    "invalid phone format: {} (10-15 digits, optional leading +)",
                    p
                )));
            }
        }
        Ok(CleanCustomer { name, email, phone })
    }

    /// Free-text label, kept exactly as submitted; only an all-blank label is rejected.
    pub fn account_type(account_type: &str) -> Result<String, LedgerError> {
        required("account_type", account_type)?;
        Ok(account_type.to_string())
    }
}

fn required(field: &str, value: &str) -> Result<String, LedgerError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(LedgerError::Validation(format!("{} is required", field)));
    }
    Ok(v.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_customer() {
        let c = RequestValidator::customer("  Ana Lee ", Some(""), None).unwrap();
        assert_eq!(c.name, "Ana Lee");
        assert_eq!(c.email, None);
        assert_eq!(c.phone, None);
    }

    #[test]
    fn rejects_blank_name() {
        assert!(matches!(
            RequestValidator::customer("   ", None, None),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn email_pattern() {
        assert!(RequestValidator::customer("A", Some("ana.lee+bank@example.co.uk"), None).is_ok());
        for bad in ["ana", "ana@", "@example.com", "ana@example", "ana lee@example.com"] {
            assert!(RequestValidator::customer("A", Some(bad), None).is_err(), "{}", bad);
        }
    }

    #[test]
    fn phone_pattern() {
        for good in ["5551234567", "+1 555 123 4567", "555.123.4567", "+44-20-7946-0958"] {
            assert!(RequestValidator::customer("A", None, Some(good)).is_ok(), "{}", good);
        }
        for bad in ["12345", "555-CALL-NOW", "+1 (555) 123-4567", "1234567890123456"] {
            assert!(RequestValidator::customer("A", None, Some(bad)).is_err(), "{}", bad);
        }
    }

    #[test]
    fn account_type_is_required_and_kept_verbatim() {
        assert_eq!(RequestValidator::account_type(" Savings ").unwrap(), " Savings ");
        assert!(RequestValidator::account_type("").is_err());
        assert!(RequestValidator::account_type(" \t ").is_err());
    }
}
