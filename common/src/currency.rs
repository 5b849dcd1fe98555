//! Currency codes and the exchange-rate table snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217 alphabetic currency code: exactly three uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate and wrap a currency code.
    pub fn new(code: impl AsRef<str>) -> Result<Self, InvalidCurrencyCode> {
        let code = code.as_ref();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_string()))
        } else {
            Err(InvalidCurrencyCode(code.to_string()))
        }
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrencyCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Error for a code that is not three uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid currency code: {0:?}")]
pub struct InvalidCurrencyCode(pub String);

/// Snapshot of mid-rates keyed by currency code, all relative to a fixed
/// base currency.
///
/// Every value is a positive finite number; the base currency itself is not
/// listed (its rate is exactly 1 by definition).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: HashMap<CurrencyCode, f64>,
}

impl RateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the mid-rate for a code.
    pub fn insert(&mut self, code: CurrencyCode, mid: f64) {
        self.rates.insert(code, mid);
    }

    /// Look up the mid-rate for a code.
    pub fn mid(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Number of listed currencies.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the table lists no currencies.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Iterate over `(code, mid)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.rates.iter().map(|(code, mid)| (code, *mid))
    }
}

impl FromIterator<(CurrencyCode, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (CurrencyCode, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}
