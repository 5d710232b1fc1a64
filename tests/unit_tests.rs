// Unit tests for Woofs Places

use woofs_places::core::{
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box},
    relations::CategoryRelations,
    scoring::{amenity_score, calculate_similarity_score, category_score, location_score, rating_score},
};
use woofs_places::models::{AmenitySet, PlaceFeatures, ScoringWeights};

fn create_place(id: &str, location_id: &str, parent: Option<&str>, types: &[&str]) -> PlaceFeatures {
    PlaceFeatures {
        id: id.to_string(),
        location_id: location_id.to_string(),
        parent_location_id: parent.map(str::to_string),
        location_level: 4,
        types: types.iter().map(|t| t.to_string()).collect(),
        rating: Some(4.2),
        indoor_allowed: false,
        outdoor_allowed: true,
        has_dog_menu: true,
        latitude: Some(-36.8485),
        longitude: Some(174.7633),
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(-36.8485, 174.7633, -36.8485, 174.7633);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_haversine_distance_symmetric() {
    let pairs = [
        ((-36.8485, 174.7633), (-41.2865, 174.7762)),
        ((51.5074, -0.1278), (48.8566, 2.3522)),
        ((0.0, 179.9), (0.0, -179.9)),
        ((89.9, 10.0), (-89.9, -170.0)),
    ];

    for ((lat1, lng1), (lat2, lng2)) in pairs {
        let forward = haversine_distance(lat1, lng1, lat2, lng2);
        let backward = haversine_distance(lat2, lng2, lat1, lng1);
        assert!((forward - backward).abs() < 1e-9, "{} != {}", forward, backward);
    }
}

#[test]
fn test_haversine_distance_ponsonby_to_devonport() {
    // Ponsonby to Devonport is approximately 5 km
    let distance = haversine_distance(-36.8570, 174.7460, -36.8300, 174.7950);
    assert!(distance > 3.0 && distance < 8.0, "got {}", distance);
}

#[test]
fn test_haversine_across_antimeridian_is_short() {
    let distance = haversine_distance(0.0, 179.9, 0.0, -179.9);
    assert!(distance < 25.0, "got {}", distance);
}

#[test]
fn test_bounding_box_creation() {
    let bbox = calculate_bounding_box(-36.8485, 174.7633, 10.0).unwrap();

    let lat_span = bbox.max_lat - bbox.min_lat;
    assert!((lat_span - 20.0 / 111.0).abs() < 1e-12);

    // Longitude degrees shrink away from the equator, so the box is wider
    let lng_span = bbox.max_lng - bbox.min_lng;
    assert!(lng_span > lat_span);

    assert!(!is_within_bounding_box(bbox.max_lat + 0.01, 174.7633, &bbox));
}

#[test]
fn test_location_score_levels() {
    let source = create_place("a", "ponsonby", Some("auckland"), &["Café"]);

    assert_eq!(location_score(&source, &create_place("b", "ponsonby", None, &[])), 1.0);
    assert_eq!(location_score(&source, &create_place("c", "parnell", Some("auckland"), &[])), 0.7);
    assert_eq!(location_score(&source, &create_place("d", "te-aro", Some("wellington"), &[])), 0.1);
}

#[test]
fn test_cafe_vs_bar_is_related() {
    let relations = CategoryRelations::default();
    let source = vec!["Café".to_string()];
    let candidate = vec!["Bar".to_string()];
    assert_eq!(category_score(&source, &candidate, &relations), 0.6);
}

#[test]
fn test_amenity_jaccard_properties() {
    let empty = AmenitySet::from_flags(false, false, false);
    let indoor = AmenitySet::from_flags(true, false, false);
    let outdoor = AmenitySet::from_flags(false, true, false);

    assert_eq!(empty.jaccard(&empty), 0.0);
    assert_eq!(indoor.jaccard(&indoor), 1.0);
    assert_eq!(indoor.jaccard(&outdoor), 0.0);

    let source = create_place("a", "x", None, &[]);
    let candidate = create_place("b", "x", None, &[]);
    assert_eq!(amenity_score(&source, &candidate), 1.0);
}

#[test]
fn test_rating_half_point_boundary() {
    assert_eq!(rating_score(Some(4.5), Some(4.0)), 1.0);
    assert_eq!(rating_score(Some(4.0), Some(4.5)), 1.0);
    assert_eq!(rating_score(Some(4.51), Some(4.0)), 0.7);
    assert_eq!(rating_score(Some(4.504), Some(4.0)), 0.7);
    assert_eq!(rating_score(Some(3.7), Some(3.2)), 1.0);
    assert_eq!(rating_score(Some(2.0), Some(3.0)), 0.7);
    assert_eq!(rating_score(Some(1.5), Some(3.0)), 0.4);
    assert_eq!(rating_score(Some(1.49), Some(3.0)), 0.0);
}

#[test]
fn test_similarity_score_bounded() {
    let weights = ScoringWeights::default();
    let relations = CategoryRelations::default();

    let ratings = [None, Some(0.0), Some(2.5), Some(5.0)];
    let type_sets: [&[&str]; 4] = [&[], &["Café"], &["Bar", "Park"], &["Hotel"]];

    for (i, source_rating) in ratings.iter().enumerate() {
        for (j, candidate_rating) in ratings.iter().enumerate() {
            let mut source = create_place("s", "ponsonby", Some("auckland"), type_sets[i]);
            source.rating = *source_rating;
            source.indoor_allowed = i % 2 == 0;

            let mut candidate = create_place("c", if j % 2 == 0 { "ponsonby" } else { "parnell" }, Some("auckland"), type_sets[j]);
            candidate.rating = *candidate_rating;
            candidate.has_dog_menu = j % 3 == 0;

            let score = calculate_similarity_score(&source, &candidate, &weights, &relations);
            assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
        }
    }
}

#[test]
fn test_self_match_scores_one() {
    let place = create_place("a", "ponsonby", Some("auckland"), &["Dog Park", "Walk"]);
    let score = calculate_similarity_score(
        &place,
        &place,
        &ScoringWeights::default(),
        &CategoryRelations::default(),
    );
    assert!((score - 1.0).abs() < 1e-12, "got {}", score);
}
