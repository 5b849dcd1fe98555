//! HTTP route registration.

use actix_web::web;

use crate::error::ApiError;

pub mod auth;
pub mod currency;
pub mod payment;

/// Register the full API surface under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(auth::scope())
            .service(currency::scope())
            .service(payment::scope()),
    );
}

/// JSON extractor configuration: malformed bodies get the standard
/// `{message}` error shape instead of the framework default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}
