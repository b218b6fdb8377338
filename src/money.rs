//! Monetary amounts
//!
//! Balances and transfer amounts are `Decimal` with cent precision. JSON input
//! accepts either a number (`40.5`) or a decimal string (`"40.50"`).

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Fractional digits a stored amount may carry
pub const AMOUNT_SCALE: u32 = 2;

/// Deserialize an amount from a JSON number or string.
///
/// Sign is preserved so that non-positive amounts reach validation and are
/// reported as invalid amounts rather than malformed input.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DecimalOrString {
        String(String),
        Number(Decimal),
    }

    match DecimalOrString::deserialize(deserializer)? {
        DecimalOrString::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(D::Error::custom("Amount cannot be empty"));
            }
            if s.starts_with('.') || s.ends_with('.') {
                return Err(D::Error::custom("Invalid amount format"));
            }
            Decimal::from_str(s).map_err(|e| D::Error::custom(format!("Invalid decimal: {}", e)))
        }
        DecimalOrString::Number(d) => Ok(d),
    }
}

/// True when `amount` is strictly positive and has at most cent precision
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount.normalize().scale() <= AMOUNT_SCALE
}

/// `$40.00` style rendering used in confirmations
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount)
}
