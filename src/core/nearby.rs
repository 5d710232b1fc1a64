use crate::core::{
    distance::{calculate_bounding_box, distance_between, GeoError},
    filters::{matches_nearby_query, NearbyQuery},
};
use crate::models::{Coordinate, NearbyPlace, NearbyResult, PlaceFeatures};

/// Find the places within `radius_km` of `center`, closest first
///
/// # Pipeline Stages
/// 1. Bounding box pre-filter (places without coordinates are skipped)
/// 2. Exclusion of `exclude_id`
/// 3. Exact haversine distance, keeping `distance <= radius_km`
/// 4. Stable ascending sort and truncation to `limit`
///
/// # Errors
/// `GeoError` for a non-finite center or a negative / non-finite radius.
/// Bad candidates never fail the search.
pub fn find_nearby<P>(
    center: Coordinate,
    radius_km: f64,
    candidates: Vec<P>,
    exclude_id: Option<&str>,
    limit: usize,
) -> Result<NearbyResult<P>, GeoError>
where
    P: AsRef<PlaceFeatures>,
{
    let bounding_box = calculate_bounding_box(center.lat, center.lng, radius_km)?;

    let query = NearbyQuery {
        bounding_box,
        exclude_id: exclude_id.map(str::to_string),
    };

    let mut places: Vec<NearbyPlace<P>> = candidates
        .into_iter()
        // Stages 1 & 2: cheap pre-filter
        .filter(|place| matches_nearby_query(place.as_ref(), &query))
        // Stage 3: exact distance
        .filter_map(|place| {
            let position = place.as_ref().coordinate()?;
            let distance = distance_between(&center, &position);
            (distance <= radius_km).then_some(NearbyPlace { place, distance })
        })
        .collect();

    // Stage 4: closest first
    places.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    places.truncate(limit);

    Ok(NearbyResult {
        places,
        center,
        radius: radius_km,
    })
}
