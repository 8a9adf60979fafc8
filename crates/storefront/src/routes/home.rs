//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::report_upstream_error;
use crate::routes::products::ProductView;
use crate::services::cart::SessionCart;
use crate::state::AppState;

/// Shown in place of the listing when the catalog cannot be fetched.
pub const CATALOG_ERROR: &str = "We couldn't load products right now.";

/// Remediation hint shown under [`CATALOG_ERROR`].
pub const CATALOG_ERROR_HINT: &str =
    "Please ensure your Printify API key is set correctly in the .env file.";

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub error: Option<&'static str>,
    pub error_hint: &'static str,
    pub cart_count: u64,
}

/// Display the home page with the full product listing.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart_count = SessionCart::load(session).await.count();

    let (products, error) = match state.printify().list_products().await {
        Ok(products) => (products.iter().map(ProductView::from).collect(), None),
        Err(e) => {
            report_upstream_error(&e, "home page");
            (Vec::new(), Some(CATALOG_ERROR))
        }
    };

    HomeTemplate {
        products,
        error,
        error_hint: CATALOG_ERROR_HINT,
        cart_count,
    }
}
