use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Kind of field work
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Siembra,
    Cosecha,
    Fumigacion,
    Otros,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [Self::Siembra, Self::Cosecha, Self::Fumigacion, Self::Otros];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Siembra => "siembra",
            Self::Cosecha => "cosecha",
            Self::Fumigacion => "fumigacion",
            Self::Otros => "otros",
        }
    }

    /// Human label used in contact messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Siembra => "Siembra",
            Self::Cosecha => "Cosecha",
            Self::Fumigacion => "Fumigación",
            Self::Otros => "Otros",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Rows written outside this service may carry types the app no longer
/// offers; they are shown and filtered as `Otros`.
impl From<String> for ServiceType {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or(Self::Otros)
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service type selector used by feeds and the prices page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceTypeFilter {
    #[default]
    All,
    Only(ServiceType),
}

impl ServiceTypeFilter {
    /// `None`, blank and `all` mean no restriction.
    pub fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(s) => ServiceType::parse(s)
                .map(Self::Only)
                .ok_or_else(|| ApiError::validation(format!("Tipo de servicio desconocido: {}", s))),
        }
    }

    pub fn matches(&self, service_type: ServiceType) -> bool {
        match self {
            Self::All => true,
            Self::Only(t) => *t == service_type,
        }
    }

    pub fn as_option(&self) -> Option<ServiceType> {
        match self {
            Self::All => None,
            Self::Only(t) => Some(*t),
        }
    }
}

/// Parses a required service type from a form field
pub fn required_service_type(raw: Option<&str>) -> Result<ServiceType, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("El tipo de servicio es obligatorio"))?;
    ServiceType::parse(raw)
        .ok_or_else(|| ApiError::validation(format!("Tipo de servicio desconocido: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_all_variants() {
        assert_eq!(ServiceTypeFilter::parse(None).unwrap(), ServiceTypeFilter::All);
        assert_eq!(ServiceTypeFilter::parse(Some(" ")).unwrap(), ServiceTypeFilter::All);
        assert_eq!(ServiceTypeFilter::parse(Some("ALL")).unwrap(), ServiceTypeFilter::All);
    }

    #[test]
    fn test_filter_exact_type() {
        let f = ServiceTypeFilter::parse(Some("Cosecha")).unwrap();
        assert!(f.matches(ServiceType::Cosecha));
        assert!(!f.matches(ServiceType::Siembra));
    }

    #[test]
    fn test_filter_unknown_type_is_validation_error() {
        assert!(matches!(
            ServiceTypeFilter::parse(Some("riego")),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_stored_type_falls_back_to_otros() {
        assert_eq!(ServiceType::from("riego".to_string()), ServiceType::Otros);
        assert_eq!(ServiceType::from("fumigacion".to_string()), ServiceType::Fumigacion);
    }
}
