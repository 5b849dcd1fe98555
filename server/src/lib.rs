//! RateTrack Server
//!
//! HTTP backend for the currency exchange tracker: user auth with bearer
//! tokens, an exchange-rate proxy with caching, currency conversion with
//! per-user history, admin currency CRUD, and the payment mock endpoints.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::web;
    use ratetrack_common::CurrencyCode;
    use ratetrack_fx::provider::MockRateSource;
    use ratetrack_fx::{ConversionEngine, RateCache};

    use crate::auth::Jwt;
    use crate::config::JwtConfig;
    use crate::service::ConversionService;
    use crate::state::AppState;
    use crate::store::memory::MemoryStore;

    /// App state over an in-memory store and a mock rate source, with the
    /// base currency and JWT setup the handler tests expect.
    pub fn test_state(source: Arc<MockRateSource>, store: Arc<MemoryStore>) -> web::Data<AppState> {
        let cache = Arc::new(RateCache::new(source));
        let engine = ConversionEngine::new(CurrencyCode::new("PLN").unwrap());
        let conversions = ConversionService::new(cache, engine, store.clone());
        let jwt = Jwt::new(&JwtConfig {
            secret: "test-secret".to_string(),
            expiry: Duration::from_secs(3600),
        });

        web::Data::new(AppState {
            users: store.clone(),
            currencies: store,
            conversions,
            jwt,
        })
    }
}
