//! JWKS-backed verification of access tokens from the hosted auth service

use anyhow::{Context, Result};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::Claims;

/// Never hit the JWKS endpoint more than once per this interval, even when
/// tokens keep arriving with unknown key ids.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Clone)]
struct CachedKey {
    key: DecodingKey,
    cached_at: Instant,
}

#[derive(Default)]
struct KeyStore {
    keys: HashMap<String, CachedKey>,
    last_fetch: Option<Instant>,
}

#[derive(Clone)]
pub struct JwksCache {
    inner: Arc<RwLock<KeyStore>>,
    http: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwksCache {
    pub fn new(
        http: reqwest::Client,
        jwks_url: String,
        issuer: String,
        audience: String,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(KeyStore::default())),
            http,
            jwks_url,
            issuer,
            audience,
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Verify signature, issuer, audience and expiry; return the claims
    pub async fn verify_token(&self, token: &str) -> Result<Claims> {
        let header = decode_header(token).context("Invalid JWT header")?;
        let kid = header.kid.context("JWT missing kid header")?;

        let decoding_key = self.get_or_fetch_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).context("JWT validation failed")?;

        Ok(token_data.claims)
    }

    fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        let store = self.inner.read();
        store
            .keys
            .get(kid)
            .filter(|cached| cached.cached_at.elapsed() < self.ttl)
            .map(|cached| cached.key.clone())
    }

    async fn get_or_fetch_key(&self, kid: &str) -> Result<DecodingKey> {
        if let Some(key) = self.cached_key(kid) {
            return Ok(key);
        }

        self.refresh_keys().await?;

        self.cached_key(kid).context("Key not found in JWKS")
    }

    async fn refresh_keys(&self) -> Result<()> {
        let recently_fetched = self
            .inner
            .read()
            .last_fetch
            .is_some_and(|last| last.elapsed() < MIN_REFRESH_INTERVAL);
        if recently_fetched {
            return Ok(());
        }

        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let jwks: JwksResponse = self
            .http
            .get(&self.jwks_url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .context("Failed to fetch JWKS")?
            .error_for_status()
            .context("JWKS endpoint returned an error")?
            .json()
            .await
            .context("Failed to parse JWKS")?;

        let mut store = self.inner.write();
        store.last_fetch = Some(Instant::now());

        for jwk in jwks.keys.into_iter().filter(|k| k.kty == "RSA") {
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
                continue;
            };
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    store.keys.insert(
                        jwk.kid.clone(),
                        CachedKey {
                            key,
                            cached_at: Instant::now(),
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(kid = %jwk.kid, error = %e, "Failed to parse JWK");
                }
            }
        }

        tracing::info!(keys = store.keys.len(), "JWKS cache refreshed");
        Ok(())
    }

    /// Pre-fetch keys at startup
    pub async fn warm_cache(&self) -> Result<()> {
        self.refresh_keys().await
    }
}
