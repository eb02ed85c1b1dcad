//! Reference price types
//!
//! Prices are aggregated by stored procedures in the database; this service
//! only asks for them and relays the rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::service_type::ServiceTypeFilter;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferencePrice {
    pub service_type: String,
    pub region: String,
    pub price_avg: Decimal,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PricesQuery {
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Arguments for `get_reference_prices`; `None` means no restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLookup {
    pub service_type: Option<String>,
    pub region: Option<String>,
}

impl PricesQuery {
    pub fn lookup(&self) -> Result<PriceLookup, ApiError> {
        let service_type = ServiceTypeFilter::parse(self.service_type.as_deref())?
            .as_option()
            .map(|t| t.as_str().to_string());
        let region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty() && !r.eq_ignore_ascii_case("all"))
            .map(str::to_string);

        Ok(PriceLookup {
            service_type,
            region,
        })
    }
}

/// Prices plus the region choices for the filter dropdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricesView {
    pub prices: Vec<ReferencePrice>,
    pub regions: Vec<String>,
}

impl PricesView {
    pub fn new(prices: Vec<ReferencePrice>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        for price in &prices {
            if !regions.contains(&price.region) {
                regions.push(price.region.clone());
            }
        }
        Self { prices, regions }
    }
}

/// Body of a successful `POST /api/update-prices`
#[derive(Debug, Serialize)]
pub struct UpdatePricesResponse {
    pub success: bool,
    pub message: String,
}

/// Body of a failed `POST /api/update-prices`
#[derive(Debug, Serialize)]
pub struct UpdatePricesError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(region: &str) -> ReferencePrice {
        ReferencePrice {
            service_type: "cosecha".to_string(),
            region: region.to_string(),
            price_avg: Decimal::new(52000, 0),
            source: "services".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_means_null_arguments() {
        let q = PricesQuery {
            service_type: Some("all".to_string()),
            region: Some("all".to_string()),
        };
        assert_eq!(
            q.lookup().unwrap(),
            PriceLookup {
                service_type: None,
                region: None
            }
        );
    }

    #[test]
    fn test_specific_lookup() {
        let q = PricesQuery {
            service_type: Some("Siembra".to_string()),
            region: Some(" Pergamino ".to_string()),
        };
        let lookup = q.lookup().unwrap();
        assert_eq!(lookup.service_type.as_deref(), Some("siembra"));
        assert_eq!(lookup.region.as_deref(), Some("Pergamino"));
    }

    #[test]
    fn test_regions_are_distinct_in_first_seen_order() {
        let view = PricesView::new(vec![price("Norte"), price("Sur"), price("Norte")]);
        assert_eq!(view.regions, vec!["Norte", "Sur"]);
        assert_eq!(view.prices.len(), 3);
    }
}
