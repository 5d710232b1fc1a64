use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Coordinate, PlaceFeatures};

/// Query for `GET /places/{id}/similar`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimilarPlacesQuery {
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_similar_limit")]
    pub limit: u16,
}

fn default_similar_limit() -> u16 {
    6
}

/// Query for `GET /places/{id}/nearby`
///
/// `lat`/`lng` default to the place's own coordinates when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyPlacesQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[validate(range(min = 0.0, max = 500.0))]
    pub radius: Option<f64>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_nearby_limit")]
    pub limit: u16,
}

fn default_nearby_limit() -> u16 {
    20
}

/// Query for `GET /places/viewport`: the visible map bounds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ViewportQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub north: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub south: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub east: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub west: f64,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_nearby_limit")]
    pub limit: u16,
}

/// Feature tuple as accepted on the wire, with range checks
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceFeaturesInput {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "locationId")]
    pub location_id: String,
    #[serde(rename = "parentLocationId", default)]
    pub parent_location_id: Option<String>,
    #[serde(rename = "locationLevel", default)]
    pub location_level: u16,
    #[serde(default)]
    pub types: Vec<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "indoorAllowed", default)]
    pub indoor_allowed: bool,
    #[serde(rename = "outdoorAllowed", default)]
    pub outdoor_allowed: bool,
    #[serde(rename = "hasDogMenu", default)]
    pub has_dog_menu: bool,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl From<PlaceFeaturesInput> for PlaceFeatures {
    fn from(input: PlaceFeaturesInput) -> Self {
        PlaceFeatures {
            id: input.id,
            location_id: input.location_id,
            parent_location_id: input.parent_location_id,
            location_level: input.location_level,
            types: input.types,
            rating: input.rating,
            indoor_allowed: input.indoor_allowed,
            outdoor_allowed: input.outdoor_allowed,
            has_dog_menu: input.has_dog_menu,
            latitude: input.latitude,
            longitude: input.longitude,
        }
    }
}

/// Body for `POST /rank/similar`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankSimilarRequest {
    #[validate(nested)]
    pub source: PlaceFeaturesInput,
    #[validate(nested)]
    #[serde(default)]
    pub candidates: Vec<PlaceFeaturesInput>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_similar_limit")]
    pub limit: u16,
}

/// Body for `POST /rank/nearby`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankNearbyRequest {
    pub center: Coordinate,
    #[validate(range(min = 0.0, max = 500.0))]
    pub radius: f64,
    #[validate(nested)]
    #[serde(default)]
    pub candidates: Vec<PlaceFeaturesInput>,
    #[serde(rename = "excludeId", default)]
    pub exclude_id: Option<String>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_nearby_limit")]
    pub limit: u16,
}
