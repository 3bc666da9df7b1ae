use std::process::ExitCode;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use song_catalog::app;
use song_catalog::config::Config;
use song_catalog::db::{Catalog, MongoSongStore, SongStore};

/// Static seed set, loaded into the collection at startup in place of
/// whatever the previous run left behind.
static SEED_SONGS: &str = include_str!("../data/songs.json");

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("❌ {err}");
            return ExitCode::FAILURE;
        }
    };
    info!("using MongoDB service at {}", config.mongodb_service);

    let store = match MongoSongStore::connect(&config.mongodb_uri()).await {
        Ok(store) => store,
        Err(err) => {
            error!("❌ Failed to build store client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let seed: Vec<Value> = match serde_json::from_str(SEED_SONGS) {
        Ok(seed) => seed,
        Err(err) => {
            error!("❌ Invalid seed fixture data/songs.json: {err}");
            return ExitCode::FAILURE;
        }
    };
    // The driver connects lazily, so a store that is down or rejecting
    // credentials shows up here first, and again on every request until it
    // recovers. Serving continues either way.
    match store.replace_all(seed).await {
        Ok(()) => info!("📀 Song collection seeded"),
        Err(err) => error!("failed to seed song collection: {err}"),
    }

    let catalog = Catalog::new(Arc::new(store));
    let app = app(catalog);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("❌ Failed to bind 0.0.0.0:{}: {err}", config.port);
            return ExitCode::FAILURE;
        }
    };
    info!("🎵 Song catalog listening on 0.0.0.0:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
