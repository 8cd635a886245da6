//! Places API server.
//!
//! Run from repo root: `cargo run -p places-server`
//! Settings come from the environment or a `.env` file (see `ServerConfig`).

use places_api::{
    app, ensure_database_exists, ensure_tables, AppState, Geocoder, GoogleGeocoder, MemoryStore, PgStore,
    ServerConfig, StaticGeocoder, StorageBackend, Store,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("places_api=info,places_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(&config.database_url)
                .await?;
            ensure_tables(&pool, &config.db_schema).await?;
            Arc::new(PgStore::new(pool, config.db_schema.clone()))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let geocoder: Arc<dyn Geocoder> = match &config.google_api_key {
        Some(key) => Arc::new(GoogleGeocoder::new(key.clone(), config.geocode_timeout)?),
        None => {
            tracing::warn!(
                lat = config.geocode_fallback.lat,
                lng = config.geocode_fallback.lng,
                "GOOGLE_API_KEY not set; every address resolves to the fallback location"
            );
            Arc::new(StaticGeocoder::new(config.geocode_fallback))
        }
    };

    let state = AppState {
        store,
        geocoder,
        default_place_image: config.default_place_image.clone(),
        default_user_image: config.default_user_image.clone(),
    };

    let router = app(state, config.body_limit_bytes);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
