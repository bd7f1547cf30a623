//! Router configuration for the HTTP API.

use axum::{middleware, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::middleware::uppercase_query_params;
use super::state::AppState;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // SIA is a public read-only service.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/sia",
            get(handlers::sia_query).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(uppercase_query_params))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
