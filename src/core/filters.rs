use crate::core::distance::is_within_bounding_box;
use crate::models::{BoundingBox, PlaceFeatures};

/// Constraints applied to candidates before exact distances are computed
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub bounding_box: BoundingBox,
    pub exclude_id: Option<String>,
}

/// Whether a place has usable coordinates
#[inline]
pub fn has_position(place: &PlaceFeatures) -> bool {
    place.coordinate().is_some()
}

/// Check if a place passes the nearby pre-filter
///
/// This is Stage 1 of the nearby pipeline: places without a position, places
/// outside the bounding box and the excluded place are dropped.
#[inline]
pub fn matches_nearby_query(place: &PlaceFeatures, query: &NearbyQuery) -> bool {
    let Some(position) = place.coordinate() else {
        return false;
    };

    if !is_within_bounding_box(position.lat, position.lng, &query.bounding_box) {
        return false;
    }

    if query.exclude_id.as_deref() == Some(place.id.as_str()) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::calculate_bounding_box;

    fn create_test_place(id: &str, lat: Option<f64>, lng: Option<f64>) -> PlaceFeatures {
        PlaceFeatures {
            id: id.to_string(),
            location_id: "ponsonby".to_string(),
            parent_location_id: None,
            location_level: 3,
            types: vec!["Park".to_string()],
            rating: None,
            indoor_allowed: false,
            outdoor_allowed: true,
            has_dog_menu: false,
            latitude: lat,
            longitude: lng,
        }
    }

    fn create_query(exclude_id: Option<&str>) -> NearbyQuery {
        NearbyQuery {
            bounding_box: calculate_bounding_box(-36.8485, 174.7633, 10.0).unwrap(),
            exclude_id: exclude_id.map(str::to_string),
        }
    }

    #[test]
    fn test_place_inside_box_matches() {
        let place = create_test_place("a", Some(-36.85), Some(174.76));
        assert!(matches_nearby_query(&place, &create_query(None)));
    }

    #[test]
    fn test_place_outside_box_filtered() {
        let place = create_test_place("a", Some(-41.2865), Some(174.7762));
        assert!(!matches_nearby_query(&place, &create_query(None)));
    }

    #[test]
    fn test_excluded_place_filtered() {
        let place = create_test_place("self", Some(-36.85), Some(174.76));
        assert!(!matches_nearby_query(&place, &create_query(Some("self"))));
        assert!(matches_nearby_query(&place, &create_query(Some("other"))));
    }

    #[test]
    fn test_missing_position_filtered() {
        let place = create_test_place("a", None, Some(174.76));
        assert!(!has_position(&place));
        assert!(!matches_nearby_query(&place, &create_query(None)));
    }
}
