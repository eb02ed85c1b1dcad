pub mod health;
pub mod lots;
pub mod me;
pub mod prices;
pub mod profiles;
pub mod requests;
pub mod services;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public
        .route("/health", get(health::health_check))
        // Session and own profile
        .route("/me", get(me::get_me))
        .route("/onboarding", post(profiles::complete_onboarding))
        .route(
            "/profile",
            get(profiles::get_my_profile).put(profiles::update_my_profile),
        )
        // Public profiles and ratings
        .route("/users/:id", get(users::get_public_profile))
        .route(
            "/users/:id/ratings",
            get(users::list_ratings).post(users::create_rating),
        )
        // Services (multipart create; the overall size cap is set in app.rs)
        .route(
            "/services",
            get(services::list_services)
                .post(services::create_service)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/services/:id", get(services::get_service))
        .route("/services/:id/status", patch(services::update_service_status))
        // Requests
        .route(
            "/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/requests/:id", get(requests::get_request))
        .route("/requests/:id/status", patch(requests::update_request_status))
        // Lots
        .route("/lots", get(lots::list_lots).post(lots::create_lot))
        // Reference prices
        .route("/prices", get(prices::list_prices))
        .route("/api/update-prices", post(prices::update_prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{create_app, AppState};
    use crate::auth::JwksCache;
    use crate::config::test_settings;
    use crate::services::StorageClient;
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Request, StatusCode},
        response::Response,
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let settings = test_settings();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&settings.database_url)
            .unwrap();
        let http = reqwest::Client::new();
        let jwks = JwksCache::new(
            http.clone(),
            settings.supabase_jwt_jwks_url.clone(),
            settings.supabase_jwt_issuer.clone(),
            settings.supabase_jwt_audience.clone(),
            settings.jwks_cache_ttl_seconds,
        );
        let storage = StorageClient::new(http, &settings);
        create_app(AppState::new(pool, settings, jwks, None, storage))
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_update_prices_requires_auth() {
        let response = test_app()
            .oneshot(
                Request::post("/api/update-prices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No autorizado");
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn test_feed_requires_auth() {
        let response = test_app()
            .oneshot(Request::get("/services").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_malformed_authorization_rejected() {
        let response = test_app()
            .oneshot(
                Request::get("/requests")
                    .header(AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Formato de autorización inválido");
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let response = test_app()
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
