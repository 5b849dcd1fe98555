//! Conversion orchestration: cached rates, arithmetic, history.

use std::sync::Arc;

use ratetrack_common::{CurrencyCode, RateTable};
use ratetrack_fx::{ConversionEngine, RateCache};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::{ConversionRecord, ConversionStore, NewConversion};

/// Outcome returned to the HTTP layer after a recorded conversion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutcome {
    pub converted_amount: f64,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
}

/// Drives the convert operation end to end: cached rate fetch, conversion
/// arithmetic, history write.
///
/// Failure at any step terminates the pipeline. Nothing is persisted unless
/// the conversion succeeded, and no result is returned unless the record was
/// written — the caller is never told a conversion succeeded that history
/// does not show.
pub struct ConversionService {
    cache: Arc<RateCache>,
    engine: ConversionEngine,
    store: Arc<dyn ConversionStore>,
}

impl ConversionService {
    pub fn new(
        cache: Arc<RateCache>,
        engine: ConversionEngine,
        store: Arc<dyn ConversionStore>,
    ) -> Self {
        Self {
            cache,
            engine,
            store,
        }
    }

    /// Current rate table, cache-first.
    pub async fn current_rates(&self) -> Result<RateTable, ApiError> {
        Ok(self.cache.get_rates().await?)
    }

    /// Convert `amount` and persist one history entry for `user_id`.
    pub async fn convert_and_record(
        &self,
        user_id: Uuid,
        from: CurrencyCode,
        to: CurrencyCode,
        amount: f64,
    ) -> Result<ConversionOutcome, ApiError> {
        let rates = self.cache.get_rates().await?;
        let converted_amount = self.engine.convert(&rates, &from, &to, amount)?;

        let conversion = NewConversion {
            user_id,
            from_currency: from.clone(),
            to_currency: to.clone(),
            amount,
            converted_amount,
        };
        conversion.validate().map_err(ApiError::InvalidRecord)?;
        self.store
            .record(conversion)
            .await
            .map_err(ApiError::store("Failed to convert currency"))?;

        info!(
            %user_id,
            from = %from,
            to = %to,
            amount,
            converted_amount,
            "Recorded conversion"
        );

        Ok(ConversionOutcome {
            converted_amount,
            from_currency: from,
            to_currency: to,
        })
    }

    /// Conversion history for one user, most recent first.
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<ConversionRecord>, ApiError> {
        self.store
            .list_for_user(user_id)
            .await
            .map_err(ApiError::store("Failed to fetch conversion history"))
    }
}
