use serde::{Deserialize, Serialize};

/// Narrow projection of a place carrying only what the scorer and the
/// nearby search read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceFeatures {
    pub id: String,
    #[serde(rename = "locationId")]
    pub location_id: String,
    #[serde(rename = "parentLocationId", default)]
    pub parent_location_id: Option<String>,
    #[serde(rename = "locationLevel", default)]
    pub location_level: u16,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "indoorAllowed", default)]
    pub indoor_allowed: bool,
    #[serde(rename = "outdoorAllowed", default)]
    pub outdoor_allowed: bool,
    #[serde(rename = "hasDogMenu", default)]
    pub has_dog_menu: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl PlaceFeatures {
    pub fn amenities(&self) -> AmenitySet {
        AmenitySet::from_flags(self.indoor_allowed, self.outdoor_allowed, self.has_dog_menu)
    }

    /// Position of the place, if it has both coordinates and both are finite
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinate { lat, lng })
            }
            _ => None,
        }
    }
}

impl AsRef<PlaceFeatures> for PlaceFeatures {
    fn as_ref(&self) -> &PlaceFeatures {
        self
    }
}

/// Set of enabled dog amenities packed into the low three bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmenitySet(u8);

impl AmenitySet {
    pub const INDOOR: u8 = 0b001;
    pub const OUTDOOR: u8 = 0b010;
    pub const DOG_MENU: u8 = 0b100;

    pub fn from_flags(indoor: bool, outdoor: bool, dog_menu: bool) -> Self {
        let mut bits = 0;
        if indoor {
            bits |= Self::INDOOR;
        }
        if outdoor {
            bits |= Self::OUTDOOR;
        }
        if dog_menu {
            bits |= Self::DOG_MENU;
        }
        Self(bits)
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Jaccard index |A ∩ B| / |A ∪ B|. Two empty sets score 0.0, not 1.0.
    pub fn jaccard(&self, other: &AmenitySet) -> f64 {
        let union = (self.0 | other.0).count_ones();
        if union == 0 {
            return 0.0;
        }
        let intersection = (self.0 & other.0).count_ones();
        intersection as f64 / union as f64
    }
}

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(rename = "minLat")]
    pub min_lat: f64,
    #[serde(rename = "maxLat")]
    pub max_lat: f64,
    #[serde(rename = "minLng")]
    pub min_lng: f64,
    #[serde(rename = "maxLng")]
    pub max_lng: f64,
}

/// Scoring weights.
///
/// `collaborative` is a reserved slot for a future collaborative-filtering
/// signal. No such signal is produced yet, so its weight takes no part in
/// the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub location: f64,
    pub category: f64,
    pub amenity: f64,
    pub rating: f64,
    pub collaborative: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            location: 0.30,
            category: 0.25,
            amenity: 0.20,
            rating: 0.15,
            collaborative: 0.10,
        }
    }
}

/// A candidate together with its similarity to the source place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPlace<P> {
    #[serde(flatten)]
    pub place: P,
    pub score: f64,
}

/// A candidate annotated with its distance from the search center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyPlace<P> {
    #[serde(flatten)]
    pub place: P,
    /// Great-circle distance in kilometers
    pub distance: f64,
}

/// Result of a nearby search, echoing the center and radius used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResult<P> {
    pub places: Vec<NearbyPlace<P>>,
    pub center: Coordinate,
    pub radius: f64,
}

/// Listing as returned by the API: the scoring features plus display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    #[serde(flatten)]
    pub features: PlaceFeatures,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "reviewsCount", default)]
    pub reviews_count: i32,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,
}

impl AsRef<PlaceFeatures> for PlaceRecord {
    fn as_ref(&self) -> &PlaceFeatures {
        &self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amenity_jaccard() {
        let none = AmenitySet::default();
        let indoor = AmenitySet::from_flags(true, false, false);
        let outdoor = AmenitySet::from_flags(false, true, false);
        let indoor_menu = AmenitySet::from_flags(true, false, true);

        assert_eq!(none.jaccard(&none), 0.0);
        assert_eq!(indoor.jaccard(&indoor), 1.0);
        assert_eq!(indoor.jaccard(&outdoor), 0.0);
        assert_eq!(indoor.jaccard(&indoor_menu), 0.5);
        assert_eq!(none.jaccard(&indoor), 0.0);
        assert_eq!(indoor_menu.len(), 2);
    }

    #[test]
    fn test_coordinate_requires_both_values() {
        let mut place = PlaceFeatures {
            id: "p".to_string(),
            location_id: "loc".to_string(),
            parent_location_id: None,
            location_level: 3,
            types: vec![],
            rating: None,
            indoor_allowed: false,
            outdoor_allowed: false,
            has_dog_menu: false,
            latitude: Some(-36.85),
            longitude: None,
        };
        assert!(place.coordinate().is_none());

        place.longitude = Some(174.76);
        assert_eq!(place.coordinate(), Some(Coordinate::new(-36.85, 174.76)));

        place.latitude = Some(f64::NAN);
        assert!(place.coordinate().is_none());
    }

    #[test]
    fn test_place_record_serializes_flat() {
        let record = PlaceRecord {
            features: PlaceFeatures {
                id: "p1".to_string(),
                location_id: "akl".to_string(),
                parent_location_id: Some("akl-region".to_string()),
                location_level: 3,
                types: vec!["Café".to_string()],
                rating: Some(4.5),
                indoor_allowed: true,
                outdoor_allowed: false,
                has_dog_menu: true,
                latitude: Some(-36.85),
                longitude: Some(174.76),
            },
            name: "Good Boy Café".to_string(),
            slug: "good-boy-cafe".to_string(),
            address: None,
            reviews_count: 12,
            is_verified: true,
            is_featured: false,
        };

        let json = serde_json::to_value(ScoredPlace { place: record, score: 0.5 }).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["locationId"], "akl");
        assert_eq!(json["hasDogMenu"], true);
        assert_eq!(json["name"], "Good Boy Café");
        assert_eq!(json["score"], 0.5);
    }
}
