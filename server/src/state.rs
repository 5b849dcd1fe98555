//! Shared application state.

use std::sync::Arc;

use crate::auth::Jwt;
use crate::service::ConversionService;
use crate::store::{CurrencyStore, UserStore};

/// State shared by every handler.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub currencies: Arc<dyn CurrencyStore>,
    pub conversions: ConversionService,
    pub jwt: Jwt,
}
