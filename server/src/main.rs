//! RateTrack server binary.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use ratetrack_common::CurrencyCode;
use ratetrack_fx::{ConversionEngine, NbpRateSource, RateCache};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ratetrack_server::auth::Jwt;
use ratetrack_server::config::ServerConfig;
use ratetrack_server::routes;
use ratetrack_server::service::ConversionService;
use ratetrack_server::state::AppState;
use ratetrack_server::store::{ConversionStore, CurrencyStore, PgStore, UserStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RateTrack server");

    let config = ServerConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;

    let base_currency = CurrencyCode::new(&config.rates.base_currency)
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;

    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;
    info!("Database ready");

    let client = reqwest::Client::builder()
        .timeout(config.rates.fetch_timeout)
        .build()?;
    let source = Arc::new(NbpRateSource::new(config.rates.url.clone(), client));
    let cache = Arc::new(RateCache::with_config(source, config.rates.cache.clone()));
    cache.clone().spawn_sweeper();

    let store = Arc::new(store);
    let state = web::Data::new(AppState {
        users: store.clone() as Arc<dyn UserStore>,
        currencies: store.clone() as Arc<dyn CurrencyStore>,
        conversions: ConversionService::new(
            cache,
            ConversionEngine::new(base_currency),
            store as Arc<dyn ConversionStore>,
        ),
        jwt: Jwt::new(&config.jwt),
    });

    info!(
        addr = %config.listen_addr,
        port = config.listen_port,
        feed = %config.rates.url,
        "Listening"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(routes::json_config())
            .configure(routes::configure)
    })
    .bind((config.listen_addr.clone(), config.listen_port))?
    .run()
    .await?;

    Ok(())
}
