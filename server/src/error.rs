//! HTTP error taxonomy and status mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use ratetrack_fx::FxError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Errors surfaced by the HTTP layer.
///
/// Each kind maps to a fixed status code and a stable, human-readable
/// `{message}` body. Internal details are logged, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unverifiable bearer identity.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Authenticated identity lacks the admin role.
    #[error("Access denied: Admins only")]
    AdminOnly,

    /// Request payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// Target record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Rate lookup or conversion failure from the FX pipeline.
    #[error(transparent)]
    Fx(#[from] FxError),

    /// Conversion record rejected at the persistence boundary.
    #[error("conversion record failed validation: {0}")]
    InvalidRecord(String),

    /// Store failure; `context` is the stable public message.
    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// Password hashing failure.
    #[error("Internal server error")]
    Hash(#[from] bcrypt::BcryptError),

    /// Token issuance failure.
    #[error("Internal server error")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Worker-pool failure while running a blocking task.
    #[error("Internal server error")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl ApiError {
    /// Attach a stable public message to a store failure.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }

    fn public_message(&self) -> String {
        match self {
            // The upstream detail goes to the log, not the client.
            ApiError::Fx(FxError::UpstreamUnavailable(_)) => {
                "Failed to fetch exchange rates".to_string()
            }
            ApiError::InvalidRecord(_) => "Failed to convert currency".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::AdminOnly => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Fx(FxError::UpstreamUnavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Fx(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidRecord(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, "Request failed");
        }
        HttpResponse::build(status).json(json!({ "message": self.public_message() }))
    }
}
