//! Postgres store implementation.

use async_trait::async_trait;
use ratetrack_common::CurrencyCode;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{
    Currency, CurrencyStore, CurrencyUpdate, ConversionRecord, ConversionStore, NewConversion,
    StoreError, User, UserRole, UserStore,
};

/// sqlx-backed store over a bounded connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with a bounded pool.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Run embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

fn into_store_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return StoreError::Duplicate;
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, password_hash, role, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(into_store_error)
    }
}

#[async_trait]
impl CurrencyStore for PgStore {
    async fn create(
        &self,
        code: &CurrencyCode,
        name: &str,
        rate: f64,
    ) -> Result<Currency, StoreError> {
        sqlx::query_as::<_, Currency>(
            "INSERT INTO currencies (id, code, name, rate) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, code, name, rate, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(code.as_str())
        .bind(name)
        .bind(rate)
        .fetch_one(&self.pool)
        .await
        .map_err(into_store_error)
    }

    async fn list(&self) -> Result<Vec<Currency>, StoreError> {
        let currencies = sqlx::query_as::<_, Currency>(
            "SELECT id, code, name, rate, created_at, updated_at \
             FROM currencies ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(currencies)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: CurrencyUpdate,
    ) -> Result<Option<Currency>, StoreError> {
        let currency = sqlx::query_as::<_, Currency>(
            "UPDATE currencies SET \
                 code = COALESCE($2, code), \
                 name = COALESCE($3, name), \
                 rate = COALESCE($4, rate), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, code, name, rate, created_at, updated_at",
        )
        .bind(id)
        .bind(changes.code.as_ref().map(CurrencyCode::as_str))
        .bind(changes.name.as_deref())
        .bind(changes.rate)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_store_error)?;

        Ok(currency)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM currencies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ConversionStore for PgStore {
    async fn record(&self, conversion: NewConversion) -> Result<ConversionRecord, StoreError> {
        sqlx::query_as::<_, ConversionRecord>(
            "INSERT INTO conversion_history \
                 (id, user_id, from_currency, to_currency, amount, converted_amount) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, from_currency, to_currency, amount, converted_amount, \
                       created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(conversion.user_id)
        .bind(conversion.from_currency.as_str())
        .bind(conversion.to_currency.as_str())
        .bind(conversion.amount)
        .bind(conversion.converted_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(into_store_error)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversionRecord>, StoreError> {
        let records = sqlx::query_as::<_, ConversionRecord>(
            "SELECT id, user_id, from_currency, to_currency, amount, converted_amount, \
                    created_at, updated_at \
             FROM conversion_history \
             WHERE user_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
