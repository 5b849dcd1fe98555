//! Rate source trait and the NBP table-A HTTP implementation.

use async_trait::async_trait;
use ratetrack_common::{CurrencyCode, RateTable};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Default endpoint for the NBP table-A mid-rate feed (rates against PLN).
pub const NBP_TABLE_A_URL: &str = "https://api.nbp.pl/api/exchangerates/tables/A?format=json";

/// Trait for exchange-rate sources.
///
/// A source performs one outbound fetch per call and never retries
/// internally; retry policy belongs to the caller. Caching is the job of
/// [`crate::cache::RateCache`], not the source.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Source name for logs.
    fn name(&self) -> &str;

    /// Fetch the current rate table from the source.
    async fn fetch_rates(&self) -> FxResult<RateTable>;
}

/// Fetches the official mid-rate table from the NBP public API.
///
/// The feed returns a one-element array of tables; each table carries a
/// `rates` list of `{currency, code, mid}` entries relative to PLN.
pub struct NbpRateSource {
    url: String,
    client: reqwest::Client,
}

impl NbpRateSource {
    /// Create a source against `url`. The request timeout is whatever the
    /// supplied client enforces.
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NbpTable {
    rates: Vec<NbpRate>,
}

#[derive(Debug, Deserialize)]
struct NbpRate {
    code: String,
    mid: f64,
}

#[async_trait]
impl RateSource for NbpRateSource {
    fn name(&self) -> &str {
        "NBP"
    }

    async fn fetch_rates(&self) -> FxResult<RateTable> {
        debug!(url = %self.url, "Requesting exchange rate table");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FxError::UpstreamUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FxError::UpstreamUnavailable(format!(
                "unexpected status {status}"
            )));
        }

        let tables: Vec<NbpTable> = response
            .json()
            .await
            .map_err(|e| FxError::UpstreamUnavailable(format!("malformed response body: {e}")))?;

        let table = tables
            .into_iter()
            .next()
            .ok_or_else(|| FxError::UpstreamUnavailable("empty table list in response".into()))?;

        let mut rates = RateTable::new();
        for entry in table.rates {
            match CurrencyCode::new(&entry.code) {
                Ok(code) if entry.mid.is_finite() && entry.mid > 0.0 => {
                    rates.insert(code, entry.mid);
                }
                _ => {
                    warn!(code = %entry.code, mid = entry.mid, "Skipping malformed rate entry");
                }
            }
        }

        debug!(currencies = rates.len(), "Fetched exchange rate table");
        Ok(rates)
    }
}

/// Mock rate source for testing. Counts fetches so tests can assert how
/// often the external feed was hit.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateSource {
    table: parking_lot::Mutex<Option<RateTable>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateSource {
    /// Create a mock with no table; fetches fail until one is set.
    pub fn new() -> Self {
        Self {
            table: parking_lot::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Create a mock serving `table`.
    pub fn with_table(table: RateTable) -> Self {
        let mock = Self::new();
        mock.set_table(table);
        mock
    }

    /// Serve `table` from now on.
    pub fn set_table(&self, table: RateTable) {
        *self.table.lock() = Some(table);
    }

    /// Fail every fetch from now on.
    pub fn fail(&self) {
        *self.table.lock() = None;
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockRateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateSource for MockRateSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_rates(&self) -> FxResult<RateTable> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.table
            .lock()
            .clone()
            .ok_or_else(|| FxError::UpstreamUnavailable("mock source has no table".into()))
    }
}
