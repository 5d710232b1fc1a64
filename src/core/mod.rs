// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod nearby;
pub mod recommender;
pub mod relations;
pub mod scoring;

pub use distance::{
    calculate_bounding_box, haversine_distance, is_within_bounding_box, viewport_search_area,
    GeoError,
};
pub use filters::{has_position, matches_nearby_query, NearbyQuery};
pub use nearby::find_nearby;
pub use recommender::SimilarityScorer;
pub use relations::CategoryRelations;
pub use scoring::{calculate_similarity_score, ScoreBreakdown};
