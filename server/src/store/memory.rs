//! In-memory store double for handler and service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use ratetrack_common::CurrencyCode;
use uuid::Uuid;

use super::{
    Currency, CurrencyStore, CurrencyUpdate, ConversionRecord, ConversionStore, NewConversion,
    StoreError, User, UserRole, UserStore,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    currencies: Mutex<Vec<Currency>>,
    conversions: Mutex<Vec<ConversionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted conversion records across all users.
    pub fn conversion_count(&self) -> usize {
        self.conversions.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CurrencyStore for MemoryStore {
    async fn create(
        &self,
        code: &CurrencyCode,
        name: &str,
        rate: f64,
    ) -> Result<Currency, StoreError> {
        let mut currencies = self.currencies.lock().unwrap();
        if currencies.iter().any(|c| c.code == code.as_str()) {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let currency = Currency {
            id: Uuid::new_v4(),
            code: code.as_str().to_string(),
            name: name.to_string(),
            rate,
            created_at: now,
            updated_at: now,
        };
        currencies.push(currency.clone());
        Ok(currency)
    }

    async fn list(&self) -> Result<Vec<Currency>, StoreError> {
        let mut currencies = self.currencies.lock().unwrap().clone();
        currencies.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(currencies)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: CurrencyUpdate,
    ) -> Result<Option<Currency>, StoreError> {
        let mut currencies = self.currencies.lock().unwrap();
        let Some(currency) = currencies.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(code) = changes.code {
            currency.code = code.as_str().to_string();
        }
        if let Some(name) = changes.name {
            currency.name = name;
        }
        if let Some(rate) = changes.rate {
            currency.rate = rate;
        }
        currency.updated_at = Utc::now();

        Ok(Some(currency.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut currencies = self.currencies.lock().unwrap();
        let before = currencies.len();
        currencies.retain(|c| c.id != id);
        Ok(currencies.len() < before)
    }
}

#[async_trait]
impl ConversionStore for MemoryStore {
    async fn record(&self, conversion: NewConversion) -> Result<ConversionRecord, StoreError> {
        let now = Utc::now();
        let record = ConversionRecord {
            id: Uuid::new_v4(),
            user_id: conversion.user_id,
            from_currency: conversion.from_currency.as_str().to_string(),
            to_currency: conversion.to_currency.as_str().to_string(),
            amount: conversion.amount,
            converted_amount: conversion.converted_amount,
            created_at: now,
            updated_at: now,
        };
        self.conversions.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversionRecord>, StoreError> {
        let conversions = self.conversions.lock().unwrap();
        let mut records: Vec<_> = conversions
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
