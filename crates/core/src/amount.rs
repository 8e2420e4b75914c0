use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Currency symbols stripped from amount text before numeric parsing.
pub const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '₹'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,
    #[error("Invalid amount: {0}")]
    Invalid(String),
}

/// Parse statement-style amount text into a signed decimal.
///
/// Accepts thousands separators, a leading sign, currency symbols, interior
/// whitespace and accounting parentheses. `(1,200.00)` parses as `-1200.00`.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    let negative = cleaned.starts_with('(') && cleaned.ends_with(')');
    let digits = cleaned.trim_matches(|c| c == '(' || c == ')');
    if digits.is_empty() {
        return Err(AmountError::Empty);
    }

    let value =
        Decimal::from_str(digits).map_err(|_| AmountError::Invalid(raw.trim().to_string()))?;
    Ok(if negative { -value } else { value })
}
