use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// Locks the browser origin down when one is configured; development
/// deployments run without one and stay permissive.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    match allowed_origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(origin),
        None => CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any),
    }
}
