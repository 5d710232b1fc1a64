use thiserror::Error;

use crate::models::{BoundingBox, Coordinate};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude (flat-earth approximation)
const KM_PER_DEGREE: f64 = 111.0;

/// Invalid input to the geometry functions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid radius: {0} (must be finite and non-negative)")]
    InvalidRadius(f64),

    #[error("Invalid coordinate: ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// Reject non-finite coordinates and latitudes beyond the poles
pub fn validate_coordinate(lat: f64, lng: f64) -> Result<(), GeoError> {
    if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 {
        return Err(GeoError::InvalidCoordinate { lat, lng });
    }
    Ok(())
}

pub fn validate_radius(radius_km: f64) -> Result<(), GeoError> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(GeoError::InvalidRadius(radius_km));
    }
    Ok(())
}

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lng1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lng2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers. Coincident points give 0, antipodal points give
/// half the Earth's circumference, never NaN.
#[inline]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` just outside [0, 1]
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two coordinates in kilometers
#[inline]
pub fn distance_between(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance(from.lat, from.lng, to.lat, to.lng)
}

/// Calculate a bounding box around a center point
///
/// This is much cheaper than Haversine for pre-filtering. The box is a
/// square in degree-space, so it always over-includes near its corners.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
///
/// # Arguments
/// * `lat` - Center latitude in degrees
/// * `lng` - Center longitude in degrees
/// * `radius_km` - Radius in kilometers
///
/// # Returns
/// BoundingBox with min/max lat/lng, or an error for a non-finite center or
/// a negative radius
pub fn calculate_bounding_box(lat: f64, lng: f64, radius_km: f64) -> Result<BoundingBox, GeoError> {
    validate_coordinate(lat, lng)?;
    validate_radius(radius_km)?;

    let lat_delta = radius_km / KM_PER_DEGREE;

    // 1 degree longitude varies by latitude
    let lng_delta = radius_km / (KM_PER_DEGREE * lat.to_radians().cos().abs());

    Ok(BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lng: lng - lng_delta,
        max_lng: lng + lng_delta,
    })
}

/// Check if a point is within a bounding box (edges inclusive)
///
/// A box whose longitude range runs past ±180° still contains points on the
/// other side of the antimeridian.
#[inline]
pub fn is_within_bounding_box(lat: f64, lng: f64, bbox: &BoundingBox) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    [lng, lng - 360.0, lng + 360.0]
        .iter()
        .any(|&l| l >= bbox.min_lng && l <= bbox.max_lng)
}

/// Turn visible map bounds into a circular search area
///
/// The center is the midpoint of the bounds and the radius is half the
/// north-east to south-west diagonal, but never below `min_radius_km`.
/// Bounds with `west > east` cross the antimeridian.
pub fn viewport_search_area(
    north: f64,
    south: f64,
    east: f64,
    west: f64,
    min_radius_km: f64,
) -> Result<(Coordinate, f64), GeoError> {
    validate_coordinate(north, east)?;
    validate_coordinate(south, west)?;
    validate_radius(min_radius_km)?;

    let unwrapped_east = if east < west { east + 360.0 } else { east };
    let mut center_lng = (unwrapped_east + west) / 2.0;
    if center_lng > 180.0 {
        center_lng -= 360.0;
    }

    let center = Coordinate::new((north + south) / 2.0, center_lng);
    let radius = (haversine_distance(north, east, south, west) / 2.0).max(min_radius_km);

    Ok((center, radius))
}
