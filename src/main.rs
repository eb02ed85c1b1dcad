mod api;
mod app;
mod auth;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod repo;
mod routes;
mod services;

use anyhow::{Context, Result};
use std::time::Duration;

use services::{RedisCache, StorageClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting agrom backend"
    );

    let pool = db::create_pool(&settings).await?;

    // Redis is optional: without it reference prices are read straight through
    let cache = match settings.redis_url.as_deref() {
        Some(url) => match RedisCache::new(url, settings.prices_cache_ttl_seconds).await {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, price cache disabled");
                None
            }
        },
        None => {
            tracing::info!("REDIS_URL not set, price cache disabled");
            None
        }
    };

    // One HTTP client shared by JWKS fetches and storage uploads
    let http_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .context("Failed to create HTTP client")?;

    let jwks_cache = auth::JwksCache::new(
        http_client.clone(),
        settings.supabase_jwt_jwks_url.clone(),
        settings.supabase_jwt_issuer.clone(),
        settings.supabase_jwt_audience.clone(),
        settings.jwks_cache_ttl_seconds,
    );

    if let Err(e) = jwks_cache.warm_cache().await {
        tracing::warn!(error = %e, "Failed to warm JWKS cache, will fetch on first request");
    }

    let storage = StorageClient::new(http_client, &settings);

    let state = app::AppState::new(pool, settings.clone(), jwks_cache, cache, storage);

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
