//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use haqq_core::{Product, ProductImage};

use crate::error::{add_breadcrumb, report_upstream_error};
use crate::routes::errors::{CatalogUnavailableTemplate, NotFoundTemplate};
use crate::services::cart::SessionCart;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: Option<ImageView>,
    pub images: Vec<ImageView>,
    pub variant_groups: Vec<VariantGroupView>,
}

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    pub hint: String,
}

/// One selectable variant dimension, e.g. "Colors".
#[derive(Clone)]
pub struct VariantGroupView {
    pub kind: String,
    /// Form field carrying the selection (`variant.<kind>`).
    pub field: String,
    pub options: Vec<String>,
}

impl From<&ProductImage> for ImageView {
    fn from(image: &ProductImage) -> Self {
        Self {
            src: image.src.clone(),
            alt: image.alt.clone(),
            width: image.width,
            height: image.height,
            hint: image.hint.clone(),
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.unit_price().display(),
            image: product.primary_image().map(ImageView::from),
            images: product.images.iter().map(ImageView::from).collect(),
            variant_groups: product
                .variant_groups()
                .iter()
                .map(|group| VariantGroupView {
                    kind: group.kind.clone(),
                    field: format!("variant.{}", group.kind),
                    options: group.options.iter().map(|o| o.value.clone()).collect(),
                })
                .collect(),
        }
    }
}

/// Query parameters for the product page.
#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    /// Set after a successful add to cart. Any value counts.
    pub added: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub recommendations: Vec<ProductView>,
    pub added: bool,
    pub cart_count: u64,
}

/// Display product detail page.
///
/// Unknown products render the 404 page and any other upstream failure the
/// catalog banner. A failed catalog listing only removes the recommendations
/// section.
#[instrument(skip(state, session, query), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ShowQuery>,
    session: Session,
) -> Response {
    let cart_count = SessionCart::load(session).await.count();

    let product = match state.printify().get_product(&id).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => {
            return (StatusCode::NOT_FOUND, NotFoundTemplate { cart_count }).into_response();
        }
        Err(e) => {
            report_upstream_error(&e, "product page");
            return CatalogUnavailableTemplate::new(cart_count).into_response();
        }
    };

    add_breadcrumb("navigation", "Viewed product page", Some(&[("product_id", id.as_str())]));

    let catalog = state.printify().list_products().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Catalog unavailable, skipping recommendations");
        Vec::new()
    });
    let recommendations = state
        .recommendations()
        .recommend(&product, &catalog)
        .await
        .iter()
        .map(ProductView::from)
        .collect();

    ProductShowTemplate {
        product: ProductView::from(&product),
        recommendations,
        added: query.added.is_some(),
        cart_count,
    }
    .into_response()
}
