//! Service listing domain types
//!
//! A service is a standing offer of work published by a contractor.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::service_type::{required_service_type, ServiceType};
use super::users::{required, UserSummary};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Active,
    Paused,
    Archived,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Archived => "archived",
        }
    }
}

impl From<String> for ServiceStatus {
    fn from(s: String) -> Self {
        // Unknown states are never shown to other users
        match s.as_str() {
            "active" => Self::Active,
            "paused" => Self::Paused,
            _ => Self::Archived,
        }
    }
}

/// Service with its contractor already joined
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceListing {
    pub id: Uuid,
    pub contractor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub coverage_area: Option<String>,
    pub reference_price: Option<Decimal>,
    pub images: Vec<String>,
    pub video_url: Option<String>,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub contractor: Option<UserSummary>,
}

/// Text fields of the create-service form. Images travel as separate
/// multipart parts and are handled by the storage client.
#[derive(Debug, Clone, Default)]
pub struct CreateServiceForm {
    pub service_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub coverage_area: Option<String>,
    pub reference_price: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub service_type: ServiceType,
    pub title: String,
    pub description: String,
    pub coverage_area: String,
    pub reference_price: Option<Decimal>,
    pub video_url: Option<String>,
}

impl ServiceListing {
    /// Visible to users other than the contractor
    pub fn is_open(&self) -> bool {
        self.status == ServiceStatus::Active
    }
}

impl CreateServiceForm {
    /// Apply one named text field from the multipart body
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "service_type" => self.service_type = Some(value),
            "title" => self.title = Some(value),
            "description" => self.description = Some(value),
            "coverage_area" => self.coverage_area = Some(value),
            "reference_price" => self.reference_price = Some(value),
            "video_url" => self.video_url = Some(value),
            other => tracing::debug!(field = other, "Ignoring unknown service form field"),
        }
    }

    pub fn validate(self) -> Result<NewService, ApiError> {
        let missing = "Por favor completá todos los campos obligatorios";
        let title = required(self.title, missing)?;
        let description = required(self.description, missing)?;
        let coverage_area = required(self.coverage_area, missing)?;
        let service_type = required_service_type(self.service_type.as_deref())?;

        let reference_price = match self.reference_price.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let price: Decimal = raw
                    .parse()
                    .map_err(|_| ApiError::validation("El precio de referencia debe ser un número"))?;
                if price <= Decimal::ZERO {
                    return Err(ApiError::validation("El precio de referencia debe ser positivo"));
                }
                Some(price)
            }
        };

        let video_url = self
            .video_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(NewService {
            service_type,
            title,
            description,
            coverage_area,
            reference_price,
            video_url,
        })
    }
}

/// Owner status change
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServiceStatusRequest {
    pub status: ServiceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateServiceForm {
        let mut form = CreateServiceForm::default();
        form.set_field("service_type", "siembra".to_string());
        form.set_field("title", "Siembra directa".to_string());
        form.set_field("description", "Sembradora de 16 surcos".to_string());
        form.set_field("coverage_area", "Pergamino y alrededores".to_string());
        form
    }

    #[test]
    fn test_valid_form_without_price() {
        let service = form().validate().unwrap();
        assert_eq!(service.service_type, ServiceType::Siembra);
        assert!(service.reference_price.is_none());
        assert!(service.video_url.is_none());
    }

    #[test]
    fn test_price_is_parsed() {
        let mut f = form();
        f.set_field("reference_price", "45000.50".to_string());
        let service = f.validate().unwrap();
        assert_eq!(service.reference_price, Some(Decimal::new(4500050, 2)));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut f = form();
        f.set_field("reference_price", "0".to_string());
        assert!(matches!(f.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_missing_coverage_rejected() {
        let mut f = form();
        f.coverage_area = Some(String::new());
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_status_from_db() {
        assert_eq!(ServiceStatus::from("paused".to_string()), ServiceStatus::Paused);
        assert_eq!(ServiceStatus::from("active".to_string()), ServiceStatus::Active);
    }
}
