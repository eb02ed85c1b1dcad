//! Rating domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::users::Role;
use crate::error::ApiError;

pub const MIN_STARS: i32 = 1;
pub const MAX_STARS: i32 = 5;

/// Who wrote a rating, as shown next to it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingAuthor {
    pub name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Rating {
    pub id: Uuid,
    pub author_id: Uuid,
    pub target_id: Uuid,
    pub stars: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: Option<RatingAuthor>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateRatingRequest {
    #[serde(default)]
    pub stars: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub stars: i32,
    pub comment: Option<String>,
}

impl CreateRatingRequest {
    pub fn validate(self) -> Result<NewRating, ApiError> {
        let stars = match self.stars {
            None | Some(0) => return Err(ApiError::validation("Por favor seleccioná una calificación")),
            Some(s) if !(MIN_STARS..=MAX_STARS).contains(&s) => {
                return Err(ApiError::validation("La calificación debe estar entre 1 y 5 estrellas"))
            }
            Some(s) => s,
        };

        let comment = self
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(NewRating { stars, comment })
    }
}

/// Criteria shown in the rating form, by the role of the person being rated
pub fn rating_criteria(target_role: Role) -> &'static [&'static str] {
    match target_role {
        Role::Contractor => &["Compromiso", "Cumplimiento", "Responsabilidad", "Calidad"],
        Role::Producer => &["Pago", "Responsabilidad", "Accesibilidad"],
        Role::Both => &[
            "Compromiso",
            "Cumplimiento",
            "Pago",
            "Responsabilidad",
            "Accesibilidad",
        ],
        Role::Unrecognized => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unselected_rating_rejected() {
        let req = CreateRatingRequest::default();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
        let req = CreateRatingRequest {
            stars: Some(0),
            comment: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let req = CreateRatingRequest {
            stars: Some(6),
            comment: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_comment_dropped() {
        let req = CreateRatingRequest {
            stars: Some(4),
            comment: Some("   ".to_string()),
        };
        let rating = req.validate().unwrap();
        assert_eq!(rating.stars, 4);
        assert!(rating.comment.is_none());
    }

    #[test]
    fn test_criteria_by_target_role() {
        assert_eq!(rating_criteria(Role::Producer).len(), 3);
        assert!(rating_criteria(Role::Contractor).contains(&"Calidad"));
        assert!(rating_criteria(Role::Unrecognized).is_empty());
    }
}
