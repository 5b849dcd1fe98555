//! Server configuration.

use std::time::Duration;

use ratetrack_fx::provider::NBP_TABLE_A_URL;
use ratetrack_fx::RateCacheConfig;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for signing tokens. Must be set via `JWT_SECRET`.
    pub secret: String,
    /// How long issued tokens remain valid.
    pub expiry: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiry: Duration::from_secs(3600),
        }
    }
}

/// Rate pipeline configuration.
#[derive(Debug, Clone)]
pub struct RatesConfig {
    /// External feed endpoint.
    pub url: String,
    /// Bound on a single outbound fetch.
    pub fetch_timeout: Duration,
    /// Currency whose rate is defined as exactly 1.
    pub base_currency: String,
    /// Cache TTL and sweep period.
    pub cache: RateCacheConfig,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            url: NBP_TABLE_A_URL.to_string(),
            fetch_timeout: Duration::from_secs(10),
            base_currency: "PLN".to_string(),
            cache: RateCacheConfig::default(),
        }
    }
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Rate pipeline configuration.
    pub rates: RatesConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 5000,
            database_url: "postgres://localhost/ratetrack".to_string(),
            jwt: JwtConfig::default(),
            rates: RatesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt.secret = secret;
        }

        if let Ok(secs) = std::env::var("JWT_EXPIRES_SECS") {
            if let Ok(secs) = secs.parse() {
                config.jwt.expiry = Duration::from_secs(secs);
            }
        }

        if let Ok(url) = std::env::var("RATES_URL") {
            config.rates.url = url;
        }

        if let Ok(code) = std::env::var("BASE_CURRENCY") {
            config.rates.base_currency = code;
        }

        if let Ok(secs) = std::env::var("RATES_CACHE_TTL_SECS") {
            if let Ok(secs) = secs.parse() {
                config.rates.cache.ttl = Duration::from_secs(secs);
            }
        }

        if let Ok(secs) = std::env::var("RATES_SWEEP_SECS") {
            if let Ok(secs) = secs.parse() {
                config.rates.cache.sweep_interval = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.database_url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if self.jwt.secret.is_empty() {
            return Err("JWT_SECRET is not defined in environment".to_string());
        }

        if self.rates.cache.ttl.is_zero() {
            return Err("Rate cache TTL cannot be zero".to_string());
        }

        Ok(())
    }
}
