//! Reference prices

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::{middleware::AuthError, RequireAuth};
use crate::domain::prices::{PricesQuery, PricesView, UpdatePricesError, UpdatePricesResponse};
use crate::error::ApiError;
use crate::repo;
use crate::services::cache::keys as cache_keys;

/// GET /prices
///
/// `service_type` and `region` narrow the lookup; `all` or empty means no
/// restriction. Served from Redis when a cached copy exists.
pub async fn list_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PricesQuery>,
    _auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = query.lookup()?;

    // Keys carry the price generation; a read that races an update writes
    // under the old generation, which nobody reads afterwards.
    let cache = match &state.cache {
        Some(cache) => cache
            .generation(cache_keys::PRICES_GENERATION)
            .await
            .map(|generation| (cache, cache_keys::prices(generation, &lookup))),
        None => None,
    };

    if let Some((cache, key)) = &cache {
        if let Some(cached) = cache.get::<PricesView>(key).await {
            return Ok(Json(DataResponse::new(cached)));
        }
    }

    let prices = repo::prices::get_reference_prices(&state.db, &lookup).await?;
    let view = PricesView::new(prices);

    if let Some((cache, key)) = &cache {
        if let Err(e) = cache.set(key, &view).await {
            tracing::warn!(error = %e, "Failed to cache reference prices");
        }
    }

    Ok(Json(DataResponse::new(view)))
}

/// POST /api/update-prices
///
/// Recomputes reference prices from the current services. Keeps the
/// `{success, message}` / `{error}` body shape existing callers expect
/// rather than the usual error envelope.
pub async fn update_prices(
    State(state): State<Arc<AppState>>,
    auth: Result<RequireAuth, AuthError>,
) -> Response {
    let auth = match auth {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!(reason = e.message(), "Unauthenticated price update");
            return update_failed(StatusCode::UNAUTHORIZED, "No autorizado");
        }
    };

    if let Err(e) = repo::prices::update_reference_prices(&state.db).await {
        tracing::error!(error = %e, user_id = %auth.user_id, "Reference price update failed");
        return update_failed(StatusCode::INTERNAL_SERVER_ERROR, "No se pudieron actualizar los precios");
    }

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.bump_generation(cache_keys::PRICES_GENERATION).await {
            tracing::warn!(error = %e, "Failed to invalidate price cache");
        }
    }

    tracing::info!(user_id = %auth.user_id, "Precios de referencia actualizados");

    Json(UpdatePricesResponse {
        success: true,
        message: "Precios de referencia actualizados".to_string(),
    })
    .into_response()
}

fn update_failed(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(UpdatePricesError {
            error: message.to_string(),
        }),
    )
        .into_response()
}
