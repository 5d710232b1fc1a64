use crate::core::{
    relations::CategoryRelations,
    scoring::{calculate_breakdown, ScoreBreakdown},
};
use crate::models::{PlaceFeatures, ScoredPlace, ScoringWeights};

/// Ranks candidate places by how similar they are to a source place
///
/// # Pipeline Stages
/// 1. Per-signal scoring (location, category, amenity, rating)
/// 2. Weighted combination
/// 3. Stable descending sort and truncation
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    weights: ScoringWeights,
    relations: CategoryRelations,
}

impl SimilarityScorer {
    pub fn new(weights: ScoringWeights, relations: CategoryRelations) -> Self {
        Self { weights, relations }
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: ScoringWeights::default(),
            relations: CategoryRelations::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn relations(&self) -> &CategoryRelations {
        &self.relations
    }

    pub fn breakdown(&self, source: &PlaceFeatures, candidate: &PlaceFeatures) -> ScoreBreakdown {
        calculate_breakdown(source, candidate, &self.relations)
    }

    /// Similarity of `candidate` to `source` in [0, 1]
    pub fn score(&self, source: &PlaceFeatures, candidate: &PlaceFeatures) -> f64 {
        self.breakdown(source, candidate).combine(&self.weights)
    }

    /// Score every candidate and keep the `limit` most similar
    ///
    /// # Arguments
    /// * `source` - The place recommendations are made for
    /// * `candidates` - Pre-fetched candidate places
    /// * `limit` - Maximum number of places to return
    ///
    /// # Returns
    /// Candidates with their scores, best first. Equal scores keep their
    /// input order.
    pub fn rank<P>(&self, source: &PlaceFeatures, candidates: Vec<P>, limit: usize) -> Vec<ScoredPlace<P>>
    where
        P: AsRef<PlaceFeatures>,
    {
        let mut scored: Vec<ScoredPlace<P>> = candidates
            .into_iter()
            .map(|place| {
                let score = self.score(source, place.as_ref());
                ScoredPlace { place, score }
            })
            .collect();

        // sort_by is stable, so ties stay in input order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored.truncate(limit);
        scored
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
