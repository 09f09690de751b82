//! HTTP route handlers.
//!
//! Routes carry per-route Cache-Control headers: search results may be kept
//! briefly by the client, health responses never. CORS is wide open since the
//! API is called from app web views on arbitrary origins.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod search;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HEALTH, CACHE_CONTROL_SEARCH};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// CORS policy allowing any origin, method and header, with credentials.
///
/// Wildcards cannot be combined with credentials, so the request's own
/// origin, method and headers are mirrored back instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Creates the Axum router with all routes, cache headers and CORS.
pub fn create_router(state: AppState) -> Router {
    let search_routes = Router::new()
        .route("/etsy", get(search::search))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_SEARCH),
        ));

    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new()
        .route("/healthz", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    Router::new()
        .merge(search_routes)
        .merge(health_routes)
        .with_state(state)
        .layer(cors_layer())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
