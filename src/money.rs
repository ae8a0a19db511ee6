//! Amounts are `Decimal` at the API and integer cents in storage.

use crate::error::LedgerError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Fractional digits kept for every stored amount.
pub const SCALE: u32 = 2;

/// Convert to minor units. Rejects more than two fractional digits and out-of-range values.
pub fn to_cents(amount: Decimal) -> Result<i64, LedgerError> {
    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| LedgerError::Validation(format!("amount {} is out of range", amount)))?;
    if !scaled.fract().is_zero() {
        return Err(LedgerError::Validation(format!(
            "amount {} has more than {} decimal places",
            amount, SCALE
        )));
    }
    scaled
        .to_i64()
        .ok_or_else(|| LedgerError::Validation(format!("amount {} is out of range", amount)))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, SCALE)
}

/// Parse a non-negative amount from form text. Blank text is zero.
pub fn parse_amount(text: &str) -> Result<Decimal, LedgerError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount = Decimal::from_str(text)
        .map_err(|_| LedgerError::Validation(format!("'{}' is not a number", text)))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::Validation(format!("amount {} must not be negative", amount)));
    }
    Ok(amount)
}

/// Parse a strictly positive amount from form text.
pub fn parse_positive_amount(text: &str) -> Result<Decimal, LedgerError> {
    let amount = parse_amount(text)?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation("amount must be a positive number".into()));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn cents_conversion_keeps_two_places() {
        assert_eq!(to_cents(dec!(1250.00)).unwrap(), 125_000);
        assert_eq!(to_cents(dec!(0.5)).unwrap(), 50);
        assert_eq!(from_cents(125_000), dec!(1250.00));
        assert_eq!(from_cents(-1), dec!(-0.01));
    }

    #[test]
    fn sub_cent_amounts_are_rejected() {
        assert!(matches!(to_cents(dec!(0.001)), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn parse_amount_accepts_blank_and_rejects_garbage() {
        assert_eq!(parse_amount("  ").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount(" 1000.00 ").unwrap(), dec!(1000.00));
        assert!(parse_amount("ten").is_err());
        assert!(parse_amount("-5").is_err());
    }

    #[test]
    fn positive_amount_rejects_zero() {
        assert!(parse_positive_amount("0").is_err());
        assert!(parse_positive_amount("").is_err());
        assert_eq!(parse_positive_amount("250").unwrap(), dec!(250));
    }
}
