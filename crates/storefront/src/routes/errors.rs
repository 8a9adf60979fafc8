//! Error pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;

use crate::routes::home::{CATALOG_ERROR, CATALOG_ERROR_HINT};
use crate::services::cart::SessionCart;

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub cart_count: u64,
}

/// Page shown when the catalog cannot be reached.
#[derive(Template)]
#[template(path = "catalog_unavailable.html")]
pub struct CatalogUnavailableTemplate {
    pub error: &'static str,
    pub error_hint: &'static str,
    pub cart_count: u64,
}

impl CatalogUnavailableTemplate {
    #[must_use]
    pub const fn new(cart_count: u64) -> Self {
        Self {
            error: CATALOG_ERROR,
            error_hint: CATALOG_ERROR_HINT,
            cart_count,
        }
    }
}

impl IntoResponse for CatalogUnavailableTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => (StatusCode::SERVICE_UNAVAILABLE, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render catalog error page");
                (StatusCode::SERVICE_UNAVAILABLE, CATALOG_ERROR).into_response()
            }
        }
    }
}

/// Fallback for unmatched paths.
pub async fn not_found(session: Session) -> impl IntoResponse {
    let cart_count = SessionCart::load(session).await.count();
    (StatusCode::NOT_FOUND, NotFoundTemplate { cart_count })
}
