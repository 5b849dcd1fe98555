//! FX pipeline error types.

use thiserror::Error;

/// Which request field a currency code was supplied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The `fromCurrency` field.
    From,
    /// The `toCurrency` field.
    To,
}

impl Side {
    /// Name of the request field, as it appears in user-visible messages.
    pub fn field_name(&self) -> &'static str {
        match self {
            Side::From => "fromCurrency",
            Side::To => "toCurrency",
        }
    }
}

/// Errors that can occur in the FX pipeline.
#[derive(Debug, Error)]
pub enum FxError {
    /// The external rate feed could not be reached or returned an unusable
    /// body. Retry policy belongs to the caller.
    #[error("exchange rate feed unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A currency code that is neither the base currency nor listed in the
    /// rate table. The message names which side of the request was invalid.
    #[error("Invalid {}: {}", .side.field_name(), .code)]
    UnknownCurrency { side: Side, code: String },

    /// Amount was zero, negative, or not a finite number.
    #[error("Amount must be a positive number")]
    InvalidAmount,
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_currency_names_the_side() {
        let from = FxError::UnknownCurrency {
            side: Side::From,
            code: "XXX".to_string(),
        };
        let to = FxError::UnknownCurrency {
            side: Side::To,
            code: "ABC".to_string(),
        };

        assert_eq!(from.to_string(), "Invalid fromCurrency: XXX");
        assert_eq!(to.to_string(), "Invalid toCurrency: ABC");
    }
}
