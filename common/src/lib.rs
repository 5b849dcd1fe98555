//! RateTrack Common Types
//!
//! Shared domain types for the RateTrack backend: validated currency codes
//! and the exchange-rate table snapshot served by the rate pipeline.

pub mod currency;

pub use currency::{CurrencyCode, InvalidCurrencyCode, RateTable};
