//! Feed filtering
//!
//! Runs over listings that were already scoped and fetched (newest first).
//! Pure and order-preserving: the output is a subsequence of the input, and
//! applying the same filter twice gives the same result.

use serde::Deserialize;

use super::service_listings::ServiceListing;
use super::service_type::{ServiceType, ServiceTypeFilter};
use super::work_requests::RequestListing;
use crate::error::ApiError;

/// Raw query string of a feed endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeedQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedFilter {
    search_term: String,
    service_type: ServiceTypeFilter,
    location: String,
}

impl FeedFilter {
    pub fn new(search_term: &str, service_type: ServiceTypeFilter, location: &str) -> Self {
        Self {
            search_term: search_term.trim().to_lowercase(),
            service_type,
            location: location.trim().to_lowercase(),
        }
    }

    pub fn from_query(query: &FeedQuery) -> Result<Self, ApiError> {
        Ok(Self::new(
            query.search.as_deref().unwrap_or_default(),
            ServiceTypeFilter::parse(query.service_type.as_deref())?,
            query.location.as_deref().unwrap_or_default(),
        ))
    }

    pub fn is_identity(&self) -> bool {
        self.search_term.is_empty()
            && self.location.is_empty()
            && self.service_type == ServiceTypeFilter::All
    }

    pub fn matches<T: Filterable>(&self, item: &T) -> bool {
        contains_any(item.search_fields(), &self.search_term)
            && self.service_type.matches(item.service_type())
            && contains_any(item.location_fields(), &self.location)
    }

    pub fn apply<T: Filterable + Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .filter(|item| self.matches(*item))
            .cloned()
            .collect()
    }
}

/// Empty needle matches everything, including items with no text at all.
fn contains_any(fields: Vec<Option<&str>>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// What a listing exposes to the feed filter
pub trait Filterable {
    fn search_fields(&self) -> Vec<Option<&str>>;
    fn service_type(&self) -> ServiceType;
    fn location_fields(&self) -> Vec<Option<&str>>;
}

impl Filterable for ServiceListing {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.title.as_str()), self.description.as_deref()]
    }

    fn service_type(&self) -> ServiceType {
        self.service_type
    }

    fn location_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.coverage_area.as_deref(),
            self.contractor
                .as_ref()
                .and_then(|c| c.base_location.as_deref()),
        ]
    }
}

impl Filterable for RequestListing {
    // Requests have no title; people search them by place.
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.free_location.as_deref(),
            self.lot.as_ref().map(|l| l.location.as_str()),
            self.lot.as_ref().map(|l| l.name.as_str()),
        ]
    }

    fn service_type(&self) -> ServiceType {
        self.service_type
    }

    fn location_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.free_location.as_deref(),
            self.lot.as_ref().map(|l| l.location.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lots::LotSummary;
    use crate::domain::service_listings::ServiceStatus;
    use crate::domain::users::{Role, UserSummary};
    use crate::domain::work_requests::RequestStatus;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn service(title: &str, service_type: ServiceType, coverage: &str) -> ServiceListing {
        ServiceListing {
            id: Uuid::new_v4(),
            contractor_id: Uuid::new_v4(),
            title: title.to_string(),
            description: Some(format!("{} con equipo propio", title)),
            service_type,
            coverage_area: Some(coverage.to_string()),
            reference_price: None,
            images: vec![],
            video_url: None,
            status: ServiceStatus::Active,
            created_at: Utc::now(),
            contractor: Some(UserSummary {
                id: Uuid::new_v4(),
                name: Some("Carlos".to_string()),
                role: Role::Contractor,
                base_location: Some("Junín".to_string()),
                phone: Some("+54 9 236 555-0101".to_string()),
                reputation_avg: 4.2,
            }),
        }
    }

    fn six_services() -> Vec<ServiceListing> {
        vec![
            service("Cosecha de soja", ServiceType::Cosecha, "Pergamino"),
            service("Siembra directa", ServiceType::Siembra, "Rojas"),
            service("Fumigación terrestre", ServiceType::Fumigacion, "Salto"),
            service("Flete de granos", ServiceType::Otros, "Arrecifes"),
            service("Siembra de trigo", ServiceType::Siembra, "Colón"),
            service("Cosecha de maíz", ServiceType::Cosecha, "Pergamino"),
        ]
    }

    fn request(free_location: Option<&str>, lot: Option<(&str, &str)>) -> RequestListing {
        RequestListing {
            id: Uuid::new_v4(),
            producer_id: Uuid::new_v4(),
            service_type: ServiceType::Cosecha,
            hectares: Decimal::new(50, 0),
            date_target: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            free_location: free_location.map(str::to_string),
            lot_id: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            producer: None,
            lot: lot.map(|(name, location)| LotSummary {
                id: Uuid::new_v4(),
                name: name.to_string(),
                location: location.to_string(),
            }),
        }
    }

    #[test]
    fn test_identity_filter_returns_input_unchanged() {
        let items = six_services();
        let filter = FeedFilter::new("", ServiceTypeFilter::All, "");
        assert!(filter.is_identity());
        assert_eq!(filter.apply(&items), items);
    }

    #[test]
    fn test_service_type_filter_keeps_relative_order() {
        let items = six_services();
        let filter = FeedFilter::new("", ServiceTypeFilter::Only(ServiceType::Siembra), "");
        let result = filter.apply(&items);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, items[1].id);
        assert_eq!(result[1].id, items[4].id);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = six_services();
        let filters = [
            FeedFilter::new("cosecha", ServiceTypeFilter::All, ""),
            FeedFilter::new("", ServiceTypeFilter::Only(ServiceType::Cosecha), "perga"),
            FeedFilter::new("equipo", ServiceTypeFilter::All, "jun"),
            FeedFilter::new("nada", ServiceTypeFilter::All, ""),
        ];
        for filter in filters {
            let once = filter.apply(&items);
            let twice = filter.apply(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let items = six_services();
        let before = items.clone();
        let _ = FeedFilter::new("soja", ServiceTypeFilter::All, "").apply(&items);
        assert_eq!(items, before);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let items = six_services();
        let by_title = FeedFilter::new("SIEMBRA", ServiceTypeFilter::All, "").apply(&items);
        assert_eq!(by_title.len(), 2);
        let by_description =
            FeedFilter::new("EQUIPO PROPIO", ServiceTypeFilter::All, "").apply(&items);
        assert_eq!(by_description.len(), 6);
    }

    #[test]
    fn test_location_matches_coverage_or_contractor_base() {
        let items = six_services();
        let by_coverage = FeedFilter::new("", ServiceTypeFilter::All, "pergamino").apply(&items);
        assert_eq!(by_coverage.len(), 2);
        let by_base = FeedFilter::new("", ServiceTypeFilter::All, "junín").apply(&items);
        assert_eq!(by_base.len(), 6);
    }

    #[test]
    fn test_request_search_uses_places() {
        let items = vec![
            request(Some("Pergamino"), None),
            request(None, Some(("La Esperanza", "Rojas"))),
            request(None, None),
        ];
        let by_lot_name = FeedFilter::new("esperanza", ServiceTypeFilter::All, "").apply(&items);
        assert_eq!(by_lot_name.len(), 1);
        assert_eq!(by_lot_name[0].id, items[1].id);

        // lot name is searchable but is not a location
        let by_location = FeedFilter::new("", ServiceTypeFilter::All, "esperanza").apply(&items);
        assert!(by_location.is_empty());

        let everything = FeedFilter::new("", ServiceTypeFilter::All, "").apply(&items);
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn test_from_query_rejects_unknown_type() {
        let query = FeedQuery {
            service_type: Some("riego".to_string()),
            ..Default::default()
        };
        assert!(FeedFilter::from_query(&query).is_err());
    }
}
