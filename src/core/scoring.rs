use serde::{Deserialize, Serialize};

use crate::core::relations::CategoryRelations;
use crate::models::{PlaceFeatures, ScoringWeights};

/// Per-signal similarity scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub location: f64,
    pub category: f64,
    pub amenity: f64,
    pub rating: f64,
    /// Collaborative-filtering signal; not produced yet
    pub collaborative: Option<f64>,
}

impl ScoreBreakdown {
    /// Weighted mean over the signals that are present
    ///
    /// A missing signal drops out together with its weight, so the result
    /// stays in [0, 1] whichever signals are available.
    pub fn combine(&self, weights: &ScoringWeights) -> f64 {
        let mut weighted = self.location * weights.location
            + self.category * weights.category
            + self.amenity * weights.amenity
            + self.rating * weights.rating;
        let mut total_weight = weights.location + weights.category + weights.amenity + weights.rating;

        if let Some(collaborative) = self.collaborative {
            weighted += collaborative * weights.collaborative;
            total_weight += weights.collaborative;
        }

        if total_weight <= 0.0 {
            return 0.0;
        }

        (weighted / total_weight).clamp(0.0, 1.0)
    }
}

/// Calculate the full similarity breakdown of `candidate` against `source`
///
/// Scoring formula (default weights):
/// score = (
///     location_score * 0.30 +      # Same location > same region > elsewhere
///     category_score * 0.25 +      # Shared tag > related tag > none
///     amenity_score * 0.20 +       # Jaccard over dog amenities
///     rating_score * 0.15 +        # Banded rating difference
///     collaborative * 0.10         # Reserved, skipped while absent
/// ) / sum of weights of present signals
pub fn calculate_breakdown(
    source: &PlaceFeatures,
    candidate: &PlaceFeatures,
    relations: &CategoryRelations,
) -> ScoreBreakdown {
    ScoreBreakdown {
        location: location_score(source, candidate),
        category: category_score(&source.types, &candidate.types, relations),
        amenity: amenity_score(source, candidate),
        rating: rating_score(source.rating, candidate.rating),
        collaborative: None,
    }
}

/// Calculate a similarity score (0-1) of `candidate` against `source`
pub fn calculate_similarity_score(
    source: &PlaceFeatures,
    candidate: &PlaceFeatures,
    weights: &ScoringWeights,
    relations: &CategoryRelations,
) -> f64 {
    calculate_breakdown(source, candidate, relations).combine(weights)
}

/// Location score (0-1) from the location hierarchy, not coordinates
///
/// A shared parent only counts when it is actually present on the source.
#[inline]
pub fn location_score(source: &PlaceFeatures, candidate: &PlaceFeatures) -> f64 {
    if source.location_id == candidate.location_id {
        return 1.0;
    }

    match (&source.parent_location_id, &candidate.parent_location_id) {
        (Some(a), Some(b)) if a == b => 0.7,
        _ => 0.1,
    }
}

/// Category score (0-1)
///
/// An exact shared tag always wins over a related one.
#[inline]
pub fn category_score(
    source_types: &[String],
    candidate_types: &[String],
    relations: &CategoryRelations,
) -> f64 {
    if source_types.iter().any(|t| candidate_types.contains(t)) {
        return 1.0;
    }

    let has_related = source_types.iter().any(|source_type| {
        candidate_types
            .iter()
            .any(|candidate_type| relations.is_related(source_type, candidate_type))
    });

    if has_related {
        0.6
    } else {
        0.0
    }
}

/// Amenity score (0-1), the Jaccard index of the enabled amenities
#[inline]
pub fn amenity_score(source: &PlaceFeatures, candidate: &PlaceFeatures) -> f64 {
    source.amenities().jaccard(&candidate.amenities())
}

/// Tolerance for float noise at the band edges (3.7 - 3.2 is 0.5000000000000004)
const RATING_BAND_EPSILON: f64 = 1e-9;

/// Rating score (0-1), banded on the absolute rating difference
#[inline]
pub fn rating_score(source: Option<f64>, candidate: Option<f64>) -> f64 {
    let (source, candidate) = match (source, candidate) {
        (Some(s), Some(c)) if s.is_finite() && c.is_finite() => (s, c),
        _ => return 0.0,
    };

    let diff = (source - candidate).abs();

    if diff <= 0.5 + RATING_BAND_EPSILON {
        1.0
    } else if diff <= 1.0 + RATING_BAND_EPSILON {
        0.7
    } else if diff <= 1.5 + RATING_BAND_EPSILON {
        0.4
    } else {
        0.0
    }
}
