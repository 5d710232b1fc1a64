use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::SearchSettings;
use crate::core::{calculate_bounding_box, find_nearby, viewport_search_area, GeoError, SimilarityScorer};
use crate::models::{
    Coordinate, ErrorResponse, HealthResponse, NearbyPlacesQuery, NearbyResult, PlaceFeatures,
    PlaceRecord, RankNearbyRequest, RankSimilarRequest, SimilarPlacesQuery, SimilarPlacesResponse,
    ViewportQuery,
};
use crate::services::{CacheKey, CacheManager, PlaceStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PlaceStore>,
    pub cache: Arc<CacheManager>,
    pub scorer: SimilarityScorer,
    pub search: SearchSettings,
}

/// Configure all place-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/places/viewport", web::get().to(viewport_places))
        .route("/places/{id}/similar", web::get().to(similar_places))
        .route("/places/{id}/nearby", web::get().to(nearby_places))
        .route("/places/{id}/cache", web::delete().to(invalidate_place_cache))
        .route("/rank/similar", web::post().to(rank_similar))
        .route("/rank/nearby", web::post().to(rank_nearby));
}

fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

fn store_error_response(context: &str, err: StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(message) => error_response(StatusCode::NOT_FOUND, "Place not found", message),
        other => {
            tracing::error!("{}: {}", context, other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context, other)
        }
    }
}

fn geo_error_response(err: GeoError) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "Invalid search area", err)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Similar places endpoint
///
/// GET /api/v1/places/{id}/similar?limit=6
///
/// Candidates are the other places in the same location, ranked by
/// similarity to the source place.
async fn similar_places(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<SimilarPlacesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let place_id = path.into_inner();
    let limit = query.limit as usize;

    let cache_key = CacheKey::similar(&place_id.to_string(), limit);
    if let Ok(cached) = state.cache.get::<SimilarPlacesResponse>(&cache_key).await {
        tracing::debug!("Serving similar places for {} from cache", place_id);
        return HttpResponse::Ok().json(cached);
    }

    let source = match state.store.get_place(place_id).await {
        Ok(place) => place,
        Err(e) => return store_error_response("Failed to fetch place", e),
    };

    let candidates = match state
        .store
        .places_in_location(&source.features.location_id, &source.features.id)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => return store_error_response("Failed to query candidates", e),
    };

    let total_candidates = candidates.len();
    let places = state.scorer.rank(&source.features, candidates, limit);

    // The breadcrumb is cosmetic; a failed lookup must not fail the request
    let parent_location_name = match state
        .store
        .grandparent_location_name(&source.features.location_id)
        .await
    {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Failed to fetch parent location for {}: {}", place_id, e);
            None
        }
    };

    let response = SimilarPlacesResponse {
        places,
        parent_location_name,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache similar places: {}", e);
    }

    tracing::info!(
        "Returning {} similar places for {} (from {} candidates)",
        response.places.len(),
        place_id,
        total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Nearby places endpoint
///
/// GET /api/v1/places/{id}/nearby?lat=&lng=&radius=&limit=
///
/// The search is centered on `lat`/`lng`, or on the place itself when they
/// are omitted. The place is never part of its own results.
async fn nearby_places(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<NearbyPlacesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let place_id = path.into_inner();
    let limit = query.limit as usize;
    let radius = query.radius.unwrap_or(state.search.default_radius_km);

    let center = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
        (None, None) => match state.store.get_place(place_id).await {
            Ok(place) => match place.features.coordinate() {
                Some(position) => position,
                None => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        "Missing search center",
                        format!("Place {} has no coordinates; pass lat and lng", place_id),
                    );
                }
            },
            Err(e) => return store_error_response("Failed to fetch place", e),
        },
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing search center",
                "lat and lng must be given together",
            );
        }
    };

    let place_key = place_id.to_string();
    let cache_key = CacheKey::nearby(&place_key, center.lat, center.lng, radius, limit);
    if let Ok(cached) = state.cache.get::<NearbyResult<PlaceRecord>>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    match search_nearby(&state, center, radius, Some(&place_key), limit).await {
        Ok(result) => {
            if let Err(e) = state.cache.set(&cache_key, &result).await {
                tracing::warn!("Failed to cache nearby places: {}", e);
            }

            tracing::info!(
                "Returning {} places within {}km of {}",
                result.places.len(),
                radius,
                place_id
            );

            HttpResponse::Ok().json(result)
        }
        Err(response) => response,
    }
}

/// Viewport search endpoint
///
/// GET /api/v1/places/viewport?north=&south=&east=&west=&limit=
///
/// The visible map bounds become a circular search area.
async fn viewport_places(
    state: web::Data<AppState>,
    query: web::Query<ViewportQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let (center, radius) = match viewport_search_area(
        query.north,
        query.south,
        query.east,
        query.west,
        state.search.min_viewport_radius_km,
    ) {
        Ok(area) => area,
        Err(e) => return geo_error_response(e),
    };

    let limit = query.limit as usize;
    let cache_key = CacheKey::viewport(query.north, query.south, query.east, query.west, limit);
    if let Ok(cached) = state.cache.get::<NearbyResult<PlaceRecord>>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    match search_nearby(&state, center, radius, None, limit).await {
        Ok(result) => {
            if let Err(e) = state.cache.set(&cache_key, &result).await {
                tracing::warn!("Failed to cache viewport places: {}", e);
            }
            HttpResponse::Ok().json(result)
        }
        Err(response) => response,
    }
}

/// Bounding-box prefetch from the store followed by the exact in-memory search
async fn search_nearby(
    state: &AppState,
    center: Coordinate,
    radius: f64,
    exclude_id: Option<&str>,
    limit: usize,
) -> Result<NearbyResult<PlaceRecord>, HttpResponse> {
    let bbox = calculate_bounding_box(center.lat, center.lng, radius).map_err(geo_error_response)?;

    let prefetch = limit.saturating_mul(state.search.nearby_prefetch_factor);
    let candidates = state
        .store
        .places_in_bounding_box(&bbox, exclude_id, prefetch)
        .await
        .map_err(|e| store_error_response("Failed to query nearby places", e))?;

    tracing::debug!("Bounding box prefetch returned {} candidates", candidates.len());

    find_nearby(center, radius, candidates, exclude_id, limit).map_err(geo_error_response)
}

/// Drop every cached response that may involve a place
///
/// DELETE /api/v1/places/{id}/cache
///
/// Called by the directory API after a place is edited. The place can sit in
/// similar lists of other places and in any viewport, so all ranked
/// responses go.
async fn invalidate_place_cache(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let place_id = path.into_inner();

    for pattern in CacheKey::response_patterns() {
        if let Err(e) = state.cache.invalidate_pattern(pattern).await {
            tracing::error!("Failed to invalidate cache for {}: {}", place_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to invalidate cache", e);
        }
    }

    tracing::info!("Invalidated cached responses after update to {}", place_id);
    HttpResponse::NoContent().finish()
}

/// Stateless similarity ranking
///
/// POST /api/v1/rank/similar
///
/// Request body:
/// ```json
/// {
///   "source": { "id": "string", "locationId": "string", "types": ["Café"], ... },
///   "candidates": [ ... ],
///   "limit": 6
/// }
/// ```
async fn rank_similar(
    state: web::Data<AppState>,
    req: web::Json<RankSimilarRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank_similar request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let req = req.into_inner();
    let source = PlaceFeatures::from(req.source);
    let candidates: Vec<PlaceFeatures> = req.candidates.into_iter().map(PlaceFeatures::from).collect();

    let ranked = state.scorer.rank(&source, candidates, req.limit as usize);

    HttpResponse::Ok().json(ranked)
}

/// Stateless nearby ranking
///
/// POST /api/v1/rank/nearby
///
/// Request body:
/// ```json
/// {
///   "center": { "lat": -36.85, "lng": 174.76 },
///   "radius": 10,
///   "candidates": [ ... ],
///   "excludeId": "string",
///   "limit": 20
/// }
/// ```
async fn rank_nearby(req: web::Json<RankNearbyRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank_nearby request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let req = req.into_inner();
    let candidates: Vec<PlaceFeatures> = req.candidates.into_iter().map(PlaceFeatures::from).collect();

    match find_nearby(
        req.center,
        req.radius,
        candidates,
        req.exclude_id.as_deref(),
        req.limit as usize,
    ) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => geo_error_response(e),
    }
}
