//! Rupiah amount type
//!
//! Domain primitive for donation amounts. Producers send amounts in several
//! loosely-typed shapes; every shape is coerced into a whole, non-negative
//! number of Rupiah so that a malformed amount can never reject a donation.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Currency prefix used when rendering amounts
const CURRENCY_PREFIX: &str = "Rp ";

/// Thousands separator used by the Indonesian locale
const THOUSANDS_SEPARATOR: char = '.';

/// Rupiah represents a whole, non-negative amount of Indonesian Rupiah.
///
/// # Invariants
/// - Value is never negative
/// - No fractional part (fractions are floored on coercion)
///
/// # Example
/// ```
/// use donation_relay::domain::Rupiah;
///
/// assert_eq!(Rupiah::new(1_234_567).to_string(), "Rp 1.234.567");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(into = "String")]
pub struct Rupiah(u64);

impl Rupiah {
    /// Create an amount from a whole number of Rupiah.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Zero Rupiah
    pub fn zero() -> Self {
        Self(0)
    }

    /// Coerce a loosely-typed JSON value into an amount.
    ///
    /// Numbers and numeric strings are floored. Negative, non-finite and
    /// non-numeric values become zero; values past `u64::MAX` saturate.
    pub fn from_json(value: &Value) -> Self {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_numeric(s),
            _ => None,
        };

        match number {
            // `as` saturates on overflow
            Some(n) if n.is_finite() && n > 0.0 => Self(n.floor() as u64),
            _ => Self::zero(),
        }
    }
}

/// Parse a numeric string the way a lenient form field would be read.
///
/// Surrounding whitespace is ignored and an empty string counts as zero.
fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}

/// Format a whole number of Rupiah with `.` thousands grouping.
pub fn format_rupiah(value: u64) -> String {
    let digits = value.to_string();
    let capacity = CURRENCY_PREFIX.len() + digits.len() + digits.len() / 3;
    let mut grouped = String::with_capacity(capacity);
    grouped.push_str(CURRENCY_PREFIX);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(ch);
    }

    grouped
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_rupiah(self.0))
    }
}

impl From<Rupiah> for String {
    fn from(amount: Rupiah) -> Self {
        amount.to_string()
    }
}
