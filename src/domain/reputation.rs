//! Display-side rating aggregation
//!
//! Computes an average over whatever ratings were fetched for a page. The
//! stored `reputation_avg`/`reputation_count` on the user row remain the
//! authoritative figures; this summary may legitimately differ from them.

use serde::Serialize;

use super::ratings::Rating;
use super::users::UserProfile;

pub const NO_RATINGS_LABEL: &str = "Sin calificaciones aún";

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Text for the rating badge. Zero ratings never renders as "0.0".
    pub fn label(&self) -> String {
        if self.is_empty() {
            NO_RATINGS_LABEL.to_string()
        } else {
            let noun = if self.count == 1 { "calificación" } else { "calificaciones" };
            format!("{:.1} ({} {})", self.average, self.count, noun)
        }
    }
}

/// Mean of the star values rounded to one decimal place
pub fn aggregate<I>(stars: I) -> RatingSummary
where
    I: IntoIterator<Item = i32>,
{
    let (sum, count) = stars
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), s| (sum + s as i64, count + 1));

    if count == 0 {
        return RatingSummary {
            average: 0.0,
            count: 0,
        };
    }

    let mean = sum as f64 / count as f64;
    RatingSummary {
        average: (mean * 10.0).round() / 10.0,
        count,
    }
}

pub fn aggregate_ratings(ratings: &[Rating]) -> RatingSummary {
    aggregate(ratings.iter().map(|r| r.stars))
}

/// The stored aggregate, shaped like the display one
pub fn stored_summary(profile: &UserProfile) -> RatingSummary {
    let count = profile.reputation_count.max(0) as usize;
    RatingSummary {
        average: if count == 0 {
            0.0
        } else {
            (profile.reputation_avg * 10.0).round() / 10.0
        },
        count,
    }
}

/// Both figures, with the stored one as the headline
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReputationView {
    pub headline: RatingSummary,
    pub label: String,
    pub fetched: RatingSummary,
}

impl ReputationView {
    pub fn new(profile: &UserProfile, ratings: &[Rating]) -> Self {
        let headline = stored_summary(profile);
        Self {
            label: headline.label(),
            headline,
            fetched: aggregate_ratings(ratings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::users::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(avg: f64, count: i32) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: Some("Ana".to_string()),
            role: Role::Contractor,
            base_location: None,
            phone: None,
            avatar_url: None,
            reputation_avg: avg,
            reputation_count: count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_aggregate() {
        let summary = aggregate(Vec::new());
        assert_eq!(summary, RatingSummary { average: 0.0, count: 0 });
        assert_eq!(summary.label(), NO_RATINGS_LABEL);
    }

    #[test]
    fn test_four_and_five() {
        let summary = aggregate(vec![4, 5]);
        assert_eq!(summary.average, 4.5);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.label(), "4.5 (2 calificaciones)");
    }

    #[test]
    fn test_single_rating_label() {
        assert_eq!(aggregate(vec![4]).label(), "4.0 (1 calificación)");
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        // 13 / 3 = 4.333...
        let summary = aggregate(vec![4, 4, 5]);
        assert_eq!(summary.average, 4.3);
        // 14 / 3 = 4.666...
        assert_eq!(aggregate(vec![4, 5, 5]).average, 4.7);
    }

    #[test]
    fn test_stored_figure_is_headline() {
        let view = ReputationView::new(&profile(4.86, 37), &[]);
        assert_eq!(view.headline.count, 37);
        assert_eq!(view.headline.average, 4.9);
        assert!(view.fetched.is_empty());
    }

    #[test]
    fn test_stored_zero_count_reads_no_ratings() {
        let view = ReputationView::new(&profile(3.0, 0), &[]);
        assert_eq!(view.label, NO_RATINGS_LABEL);
        assert_eq!(view.headline.average, 0.0);
    }
}
