//! Work request domain types
//!
//! A request is a specific job posting published by a producer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lots::LotSummary;
use super::service_type::{required_service_type, ServiceType};
use super::users::UserSummary;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
        }
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            _ => Self::Closed,
        }
    }
}

/// Request with producer and lot already joined
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestListing {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub service_type: ServiceType,
    pub hectares: Decimal,
    pub date_target: NaiveDate,
    pub free_location: Option<String>,
    pub lot_id: Option<Uuid>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub producer: Option<UserSummary>,
    pub lot: Option<LotSummary>,
}

impl RequestListing {
    /// Visible to users other than the producer
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Where the work happens: the lot's location if one is linked,
    /// otherwise the free-text location.
    pub fn location(&self) -> Option<&str> {
        self.lot
            .as_ref()
            .map(|l| l.location.as_str())
            .or(self.free_location.as_deref())
    }
}

/// Create-request form. Every field is optional at the wire level so that a
/// missing value becomes a validation message instead of a decode error.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateWorkRequest {
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub hectares: Option<Decimal>,
    #[serde(default)]
    pub date_target: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lot_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkRequest {
    pub service_type: ServiceType,
    pub hectares: Decimal,
    pub date_target: NaiveDate,
    pub free_location: Option<String>,
    pub lot_id: Option<Uuid>,
}

impl CreateWorkRequest {
    pub fn validate(self) -> Result<NewWorkRequest, ApiError> {
        let missing = || ApiError::validation("Completá los campos obligatorios");

        let hectares = self.hectares.ok_or_else(missing)?;
        let date_raw = self
            .date_target
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(missing)?;
        let free_location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        if free_location.is_none() && self.lot_id.is_none() {
            return Err(missing());
        }

        if hectares <= Decimal::ZERO {
            return Err(ApiError::validation("Las hectáreas deben ser un número positivo"));
        }

        let date_target = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
            .map_err(|_| ApiError::validation("La fecha objetivo debe tener formato AAAA-MM-DD"))?;

        let service_type = required_service_type(self.service_type.as_deref())?;

        Ok(NewWorkRequest {
            service_type,
            hectares,
            date_target,
            free_location,
            lot_id: self.lot_id,
        })
    }
}

/// Owner status change. Producers may only reopen or close their requests.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequestStatusRequest {
    pub status: RequestStatus,
}

impl UpdateRequestStatusRequest {
    pub fn validate(&self) -> Result<RequestStatus, ApiError> {
        match self.status {
            RequestStatus::Pending | RequestStatus::Closed => Ok(self.status),
            other => Err(ApiError::validation(format!(
                "El dueño no puede pasar una solicitud a {}",
                other.as_str()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateWorkRequest {
        CreateWorkRequest {
            service_type: Some("cosecha".to_string()),
            hectares: Some(Decimal::new(50, 0)),
            date_target: Some("2025-06-01".to_string()),
            location: Some("Pergamino".to_string()),
            lot_id: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let req = form().validate().unwrap();
        assert_eq!(req.hectares, Decimal::new(50, 0));
        assert_eq!(req.date_target, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(req.free_location.as_deref(), Some("Pergamino"));
    }

    #[test]
    fn test_blank_location_without_lot_is_rejected() {
        let mut f = form();
        f.location = Some(String::new());
        assert!(matches!(f.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_lot_replaces_free_location() {
        let mut f = form();
        f.location = None;
        f.lot_id = Some(Uuid::new_v4());
        let req = f.validate().unwrap();
        assert!(req.free_location.is_none());
        assert!(req.lot_id.is_some());
    }

    #[test]
    fn test_non_positive_hectares_rejected() {
        let mut f = form();
        f.hectares = Some(Decimal::ZERO);
        assert!(f.validate().is_err());
        let mut f = form();
        f.hectares = Some(Decimal::new(-5, 0));
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut f = form();
        f.date_target = Some("01/06/2025".to_string());
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_hectares_decode_from_json_number() {
        let f: CreateWorkRequest =
            serde_json::from_str(r#"{"service_type":"siembra","hectares":12.5}"#).unwrap();
        assert_eq!(f.hectares, Some(Decimal::new(125, 1)));
    }

    #[test]
    fn test_owner_cannot_accept_own_request() {
        let req = UpdateRequestStatusRequest {
            status: RequestStatus::Accepted,
        };
        assert!(req.validate().is_err());
        let req = UpdateRequestStatusRequest {
            status: RequestStatus::Closed,
        };
        assert_eq!(req.validate().unwrap(), RequestStatus::Closed);
    }
}
