//! Woofs Places - similarity and nearby search for the Woofs place directory
//!
//! This library provides the two ranking algorithms behind a place page:
//! "similar places" (weighted multi-factor similarity) and "nearby places"
//! (bounding-box pre-filter plus exact haversine distance).

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    find_nearby, CategoryRelations, GeoError, SimilarityScorer,
    distance::{calculate_bounding_box, haversine_distance},
};
pub use crate::models::{Coordinate, NearbyResult, PlaceFeatures, PlaceRecord, ScoredPlace, ScoringWeights};
