//! Lot domain types
//!
//! A lot is a named field a producer can attach to requests instead of a
//! free-text location.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::users::required;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Lot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub location: String,
    pub surface_total_ha: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Lot as embedded in a request listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LotSummary {
    pub id: Uuid,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateLotRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub surface_total_ha: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLot {
    pub name: String,
    pub location: String,
    pub surface_total_ha: Option<Decimal>,
}

impl CreateLotRequest {
    pub fn validate(self) -> Result<NewLot, ApiError> {
        let name = required(self.name, "El nombre del lote es obligatorio")?;
        let location = required(self.location, "La ubicación del lote es obligatoria")?;
        if matches!(self.surface_total_ha, Some(s) if s <= Decimal::ZERO) {
            return Err(ApiError::validation("La superficie debe ser un número positivo"));
        }

        Ok(NewLot {
            name,
            location,
            surface_total_ha: self.surface_total_ha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lot_requires_location() {
        let req = CreateLotRequest {
            name: Some("La Esperanza".to_string()),
            location: None,
            surface_total_ha: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_lot_surface_must_be_positive() {
        let req = CreateLotRequest {
            name: Some("La Esperanza".to_string()),
            location: Some("Rojas".to_string()),
            surface_total_ha: Some(Decimal::ZERO),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_lot() {
        let req = CreateLotRequest {
            name: Some(" La Esperanza ".to_string()),
            location: Some("Rojas".to_string()),
            surface_total_ha: Some(Decimal::new(120, 0)),
        };
        let lot = req.validate().unwrap();
        assert_eq!(lot.name, "La Esperanza");
    }
}
