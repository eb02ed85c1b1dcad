use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub database: &'static str,
    /// `disabled` when no Redis is configured
    pub redis: &'static str,
}

/// GET /health
///
/// Public. The database is critical; Redis only degrades price lookups.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let redis_check = async {
        match &state.cache {
            Some(cache) => Some(cache.health_check().await.is_ok()),
            None => None,
        }
    };

    let (db_ok, redis_ok) = tokio::join!(db::health_check(&state.db), redis_check);

    let redis = match redis_ok {
        Some(true) => "ok",
        Some(false) => "error",
        None => "disabled",
    };

    let status = match (db_ok, redis_ok) {
        (false, _) => "unhealthy",
        (true, Some(false)) => "degraded",
        (true, _) => "healthy",
    };

    let status_code = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            services: ServiceHealth {
                database: if db_ok { "ok" } else { "error" },
                redis,
            },
        }),
    )
}
