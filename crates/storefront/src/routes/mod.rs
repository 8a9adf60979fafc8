//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page with product listing
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product detail with recommendations
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (redirects to product page)
//! POST /cart/update            - Update quantity (redirects to cart)
//! POST /cart/remove            - Remove item (redirects to cart)
//! POST /cart/clear             - Empty cart (redirects to cart)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form and order summary
//! POST /checkout               - Place order
//!
//! # JSON API
//! GET  /api/products/{id}      - Product JSON
//! ```

pub mod api;
pub mod cart;
pub mod checkout;
pub mod errors;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Rate limiters applied to upstream-heavy routes.
pub struct RouteLimits {
    pub api: RateLimiterLayer,
    pub checkout: RateLimiterLayer,
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/products/{id}", get(api::products::show))
}

/// Create all routes for the storefront.
pub fn routes(limits: Option<RouteLimits>) -> Router<AppState> {
    let mut api = api_routes();
    let mut place_order = post(checkout::submit);

    if let Some(limits) = limits {
        api = api.layer(limits.api);
        place_order = place_order.layer(limits.checkout);
    }

    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).merge(place_order))
        .nest("/api", api)
        .fallback(errors::not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
