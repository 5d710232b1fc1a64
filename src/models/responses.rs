use serde::{Deserialize, Serialize};
use crate::models::domain::{PlaceRecord, ScoredPlace};

/// Response for the similar places endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPlacesResponse {
    pub places: Vec<ScoredPlace<PlaceRecord>>,
    /// Name of the region two levels above the source place's location
    #[serde(rename = "parentLocationName")]
    pub parent_location_name: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
