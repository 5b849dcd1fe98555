//! Persistence traits and records.
//!
//! Handlers and the conversion service talk to storage through these traits;
//! the production implementation is [`PgStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ratetrack_common::CurrencyCode;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
pub(crate) mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated.
    #[error("duplicate key")]
    Duplicate,

    /// Underlying database failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Role carried by a user account and its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Parse a stored value; unknown values degrade to `user`.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Parsed role.
    pub fn user_role(&self) -> UserRole {
        UserRole::parse(&self.role)
    }
}

/// Admin-managed currency record.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a currency record that an update may change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrencyUpdate {
    pub code: Option<CurrencyCode>,
    pub name: Option<String>,
    pub rate: Option<f64>,
}

/// Durable log entry of one completed conversion, owned by a user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub converted_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A conversion awaiting persistence.
#[derive(Debug, Clone)]
pub struct NewConversion {
    pub user_id: Uuid,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub amount: f64,
    pub converted_amount: f64,
}

impl NewConversion {
    /// Re-check the constraints the history table enforces. Validation
    /// earlier in the pipeline should make a violation unreachable here.
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(format!("amount must be non-negative, got {}", self.amount));
        }
        if !self.converted_amount.is_finite() || self.converted_amount < 0.0 {
            return Err(format!(
                "converted amount must be non-negative, got {}",
                self.converted_amount
            ));
        }
        Ok(())
    }
}

/// Store for registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, StoreError>;
}

/// Store for admin-managed currency records.
#[async_trait]
pub trait CurrencyStore: Send + Sync {
    async fn create(
        &self,
        code: &CurrencyCode,
        name: &str,
        rate: f64,
    ) -> Result<Currency, StoreError>;

    async fn list(&self) -> Result<Vec<Currency>, StoreError>;

    /// Apply `changes`; returns `None` when no record has `id`.
    async fn update(
        &self,
        id: Uuid,
        changes: CurrencyUpdate,
    ) -> Result<Option<Currency>, StoreError>;

    /// Returns whether a record was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Store for conversion history entries.
#[async_trait]
pub trait ConversionStore: Send + Sync {
    /// Persist one conversion. Exactly one durable write; no update-in-place.
    async fn record(&self, conversion: NewConversion) -> Result<ConversionRecord, StoreError>;

    /// History for one user, most recent first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversionRecord>, StoreError>;
}
