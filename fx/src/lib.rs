//! RateTrack FX Pipeline
//!
//! Exchange-rate acquisition and conversion for the RateTrack backend.
//!
//! # Features
//!
//! - Rate source trait with an NBP table-A HTTP implementation
//! - Single-slot rate-table cache with TTL and a background sweep
//! - Pure conversion arithmetic with an explicit base currency
//!
//! # Example
//!
//! ```rust,ignore
//! use ratetrack_fx::{ConversionEngine, NbpRateSource, RateCache};
//!
//! let source = Arc::new(NbpRateSource::new(url, client));
//! let cache = Arc::new(RateCache::new(source));
//! let engine = ConversionEngine::new(base_currency);
//!
//! let rates = cache.get_rates().await?;
//! let converted = engine.convert(&rates, &from, &to, 100.0)?;
//! ```

pub mod cache;
pub mod engine;
pub mod error;
pub mod provider;

pub use cache::{RateCache, RateCacheConfig};
pub use engine::ConversionEngine;
pub use error::{FxError, FxResult, Side};
pub use provider::{NbpRateSource, RateSource};
