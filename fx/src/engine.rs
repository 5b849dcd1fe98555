//! Pure conversion arithmetic over a rate table.

use ratetrack_common::{CurrencyCode, RateTable};

use crate::error::{FxError, FxResult, Side};

/// Computes converted amounts from a rate table.
///
/// All rates in the table are expressed relative to a fixed base currency,
/// whose own rate is exactly 1. The engine performs no I/O and does not
/// mutate the table.
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    base_currency: CurrencyCode,
}

impl ConversionEngine {
    /// Create an engine for tables quoted against `base_currency`.
    pub fn new(base_currency: CurrencyCode) -> Self {
        Self { base_currency }
    }

    /// The currency whose rate is defined as exactly 1.
    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// Convert `amount` from one currency to another using `table`.
    ///
    /// Returns the raw floating-point quotient `amount * from_rate / to_rate`;
    /// no rounding is applied. Callers requiring currency-grade rounding must
    /// post-process.
    pub fn convert(
        &self,
        table: &RateTable,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: f64,
    ) -> FxResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FxError::InvalidAmount);
        }

        let from_rate = self.resolve(table, from, Side::From)?;
        let to_rate = self.resolve(table, to, Side::To)?;

        Ok(amount * from_rate / to_rate)
    }

    fn resolve(&self, table: &RateTable, code: &CurrencyCode, side: Side) -> FxResult<f64> {
        if *code == self.base_currency {
            return Ok(1.0);
        }
        table.mid(code).ok_or_else(|| FxError::UnknownCurrency {
            side,
            code: code.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    fn engine() -> ConversionEngine {
        ConversionEngine::new(code("PLN"))
    }

    fn table() -> RateTable {
        [(code("USD"), 4.0), (code("EUR"), 5.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_converts_between_listed_currencies() {
        let converted = engine()
            .convert(&table(), &code("USD"), &code("EUR"), 100.0)
            .unwrap();

        assert_eq!(converted, 80.0);
    }

    #[test]
    fn test_base_currency_rate_is_one() {
        let engine = engine();
        let table = table();

        let from_base = engine
            .convert(&table, &code("PLN"), &code("USD"), 10.0)
            .unwrap();
        assert_eq!(from_base, 2.5);

        let to_base = engine
            .convert(&table, &code("USD"), &code("PLN"), 10.0)
            .unwrap();
        assert_eq!(to_base, 40.0);
    }

    #[test]
    fn test_same_currency_returns_amount() {
        let converted = engine()
            .convert(&table(), &code("USD"), &code("USD"), 123.45)
            .unwrap();

        assert_eq!(converted, 123.45);
    }

    #[test]
    fn test_unknown_from_currency() {
        let err = engine()
            .convert(&table(), &code("XXX"), &code("EUR"), 10.0)
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid fromCurrency: XXX");
    }

    #[test]
    fn test_unknown_to_currency() {
        let err = engine()
            .convert(&table(), &code("USD"), &code("XXX"), 10.0)
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid toCurrency: XXX");
    }

    #[test]
    fn test_invalid_amount_checked_before_rate_lookup() {
        // Unknown codes on both sides, but the amount fails first.
        for amount in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err = engine()
                .convert(&table(), &code("XXX"), &code("YYY"), amount)
                .unwrap_err();
            assert!(matches!(err, FxError::InvalidAmount), "amount {amount}");
        }
    }

    #[test]
    fn test_pure_same_inputs_same_output() {
        let engine = engine();
        let table = table();

        let a = engine.convert(&table, &code("USD"), &code("EUR"), 7.0).unwrap();
        let b = engine.convert(&table, &code("USD"), &code("EUR"), 7.0).unwrap();

        assert_eq!(a, b);
        assert_eq!(table, self::table());
    }
}
