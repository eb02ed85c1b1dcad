//! Redis cache for reference prices
//!
//! Price lookups go through a stored procedure that scans every service, so
//! results are kept for a short TTL. Every key embeds a generation counter
//! that is bumped when prices are recomputed, so older entries are never read
//! again and expire on their own. Cache failures are logged and treated as
//! misses.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    pub async fn new(redis_url: &str, default_ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!("Redis cache connected");

        Ok(Self {
            conn,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        })
    }

    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(value) => {
                    debug!(key, "Cache hit");
                    Some(value)
                }
                Err(e) => {
                    warn!(key, error = %e, "Failed to deserialize cached value");
                    None
                }
            },
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Redis get error");
                None
            }
        }
    }

    #[instrument(skip(self, value))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut conn = self.conn.clone();

        let data = serde_json::to_string(value).context("Failed to serialize value for cache")?;

        conn.set_ex::<_, _, ()>(key, data, self.default_ttl.as_secs())
            .await
            .context("Failed to set cache value")?;

        debug!(key, ttl_secs = self.default_ttl.as_secs(), "Cached value");
        Ok(())
    }

    /// Current value of a generation counter, 0 when unset. `None` when
    /// Redis cannot be read, in which case callers skip the cache.
    #[instrument(skip(self))]
    pub async fn generation(&self, key: &str) -> Option<u64> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<u64>>(key).await {
            Ok(value) => Some(value.unwrap_or(0)),
            Err(e) => {
                warn!(key, error = %e, "Redis generation read error");
                None
            }
        }
    }

    /// Advance a generation counter. Entries written under older
    /// generations are never read again and age out with their TTL.
    #[instrument(skip(self))]
    pub async fn bump_generation(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let next: u64 = conn
            .incr(key, 1u64)
            .await
            .context("Failed to bump cache generation")?;
        debug!(key, next, "Cache generation bumped");
        Ok(next)
    }

    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis health check failed")?;
        Ok(())
    }
}

/// Cache key builders
pub mod keys {
    use crate::domain::prices::PriceLookup;

    /// Counter bumped on every price recomputation
    pub const PRICES_GENERATION: &str = "prices:generation";

    /// Unrestricted parts are `name:*`, restricted ones `name=<value>`, so no
    /// user-supplied value can produce the key of an unrestricted lookup.
    pub fn prices(generation: u64, lookup: &PriceLookup) -> String {
        format!(
            "prices:g{}:{}:{}",
            generation,
            part("type", lookup.service_type.as_deref()),
            part("region", lookup.region.as_deref())
        )
    }

    fn part(name: &str, value: Option<&str>) -> String {
        match value {
            Some(v) => format!("{}={}", name, v),
            None => format!("{}:*", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::keys;
    use crate::domain::prices::{PriceLookup, PricesQuery};

    fn lookup(service_type: Option<&str>, region: Option<&str>) -> PriceLookup {
        PriceLookup {
            service_type: service_type.map(str::to_string),
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn test_price_keys_distinguish_lookups() {
        assert_eq!(keys::prices(0, &lookup(None, None)), "prices:g0:type:*:region:*");
        assert_eq!(
            keys::prices(3, &lookup(Some("siembra"), Some("Pergamino"))),
            "prices:g3:type=siembra:region=Pergamino"
        );
    }

    #[test]
    fn test_region_value_cannot_alias_unrestricted_key() {
        let unrestricted = keys::prices(0, &lookup(None, None));
        for region in ["_", "*", ":*", "region:*", "all*"] {
            let query = PricesQuery {
                service_type: None,
                region: Some(region.to_string()),
            };
            let key = keys::prices(0, &query.lookup().unwrap());
            assert_ne!(key, unrestricted, "region {:?}", region);
        }
    }

    #[test]
    fn test_generation_separates_entries() {
        let l = lookup(Some("cosecha"), None);
        assert_ne!(keys::prices(1, &l), keys::prices(2, &l));
    }
}
