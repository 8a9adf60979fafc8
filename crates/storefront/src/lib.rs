//! Haqq Apparel Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. [`app`] builds the full router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod printify;
pub mod recommendations;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use routes::RouteLimits;
use state::AppState;

/// Static assets directory.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the storefront router without rate limiting.
pub fn app(state: AppState) -> Router {
    build(state, None)
}

/// Build the storefront router with rate limits on `/api` and checkout
/// submission.
pub fn app_with_rate_limits(state: AppState) -> Router {
    build(
        state,
        Some(RouteLimits {
            api: middleware::api_rate_limiter(),
            checkout: middleware::checkout_rate_limiter(),
        }),
    )
}

fn build(state: AppState, limits: Option<RouteLimits>) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    routes::routes(limits)
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn_with_state(
            middleware::SecurityHeaders::new(printify::IMAGE_ORIGINS),
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
