// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AmenitySet, BoundingBox, Coordinate, NearbyPlace, NearbyResult, PlaceFeatures, PlaceRecord,
    ScoredPlace, ScoringWeights,
};
pub use requests::{
    NearbyPlacesQuery, PlaceFeaturesInput, RankNearbyRequest, RankSimilarRequest,
    SimilarPlacesQuery, ViewportQuery,
};
pub use responses::{ErrorResponse, HealthResponse, SimilarPlacesResponse};
