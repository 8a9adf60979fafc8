//! Cart route handlers.
//!
//! The cart is stored in the visitor's session. Mutations are plain form
//! posts that redirect back to the cart page.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use haqq_core::pricing::{line_total, subtotal};
use haqq_core::{CartLineItem, Price, Product, ProductId, VariantSelection};

use crate::error::{AppError, add_breadcrumb};
use crate::routes::products::ImageView;
use crate::services::cart::{SessionCart, log_save, resolve_products};
use crate::state::AppState;

/// Form field prefix for variant selections (`variant.Colors=Black`).
pub const VARIANT_FIELD_PREFIX: &str = "variant.";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub variant: Option<String>,
    pub quantity: u32,
    pub unit_price: Option<String>,
    pub line_price: Option<String>,
    pub image: Option<ImageView>,
}

impl CartLineView {
    /// Build the view for one line. `product` is `None` when it could not be
    /// fetched; such lines still show so they can be removed.
    #[must_use]
    pub fn new(line: &CartLineItem, product: Option<&Product>) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            name: product.map_or_else(
                || "Product unavailable".to_string(),
                |p| p.name.clone(),
            ),
            variant: line.variant.as_ref().map(format_variant),
            quantity: line.quantity,
            unit_price: product.map(|p| p.unit_price().display()),
            line_price: product.map(|p| Price::usd(line_total(line, p)).display()),
            image: product.and_then(Product::primary_image).map(ImageView::from),
        }
    }
}

/// `Colors: Black, Sizes: M`
fn format_variant(selection: &VariantSelection) -> String {
    selection
        .iter()
        .map(|(kind, value)| format!("{kind}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build line views for every cart line in order.
#[must_use]
pub fn line_views(
    items: &[CartLineItem],
    products: &HashMap<ProductId, Product>,
) -> Vec<CartLineView> {
    items
        .iter()
        .map(|line| CartLineView::new(line, products.get(&line.product_id)))
        .collect()
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub cart_count: u64,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u64,
}

/// Parsed add-to-cart submission.
#[derive(Debug, PartialEq, Eq)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: NonZeroU32,
    pub variant: Option<VariantSelection>,
}

impl AddToCart {
    /// Parse the raw form. Fields are `product_id`, optional `quantity`
    /// (default 1) and any number of `variant.<Type>` selections.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the product id is missing or the quantity is
    /// not a positive integer.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, AppError> {
        let product_id = form
            .get("product_id")
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("product_id is required".to_string()))?;

        let quantity = match form.get("quantity").map(|q| q.trim()) {
            None | Some("") => NonZeroU32::MIN,
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .map_err(|_| AppError::BadRequest("quantity must be at least 1".to_string()))?,
        };

        let variant: BTreeMap<String, String> = form
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(VARIANT_FIELD_PREFIX)
                    .filter(|kind| !kind.is_empty() && !value.is_empty())
                    .map(|kind| (kind.to_string(), value.clone()))
            })
            .collect();

        Ok(Self {
            product_id: ProductId::new(product_id),
            quantity,
            variant: (!variant.is_empty()).then_some(variant),
        })
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = SessionCart::load(session).await;
    let products = resolve_products(state.printify(), cart.items()).await;

    CartShowTemplate {
        lines: line_views(cart.items(), &products),
        subtotal: Price::usd(subtotal(cart.items(), &products)).display(),
        cart_count: cart.count(),
    }
}

/// Add item to cart.
#[instrument(skip(session, form))]
pub async fn add(
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let request = AddToCart::from_form(&form)?;

    let mut cart = SessionCart::load(session).await;
    log_save(&cart.store_mut().add_item(
        request.product_id.clone(),
        request.quantity,
        request.variant,
    ));
    cart.commit().await;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", request.product_id.as_str())]),
    );
    tracing::info!(
        product_id = %request.product_id,
        quantity = request.quantity.get(),
        "Added to cart"
    );

    Ok(Redirect::to(&format!("/products/{}?added=1", request.product_id)).into_response())
}

/// Update cart item quantity. Zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Redirect {
    let mut cart = SessionCart::load(session).await;
    log_save(
        &cart
            .store_mut()
            .update_item_quantity(&ProductId::new(form.product_id), form.quantity),
    );
    cart.commit().await;

    Redirect::to("/cart")
}

/// Remove item from cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Redirect {
    let mut cart = SessionCart::load(session).await;
    log_save(&cart.store_mut().remove_item(&ProductId::new(form.product_id)));
    cart.commit().await;

    Redirect::to("/cart")
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Redirect {
    let mut cart = SessionCart::load(session).await;
    log_save(&cart.store_mut().clear_cart());
    cart.commit().await;

    Redirect::to("/cart")
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        cart_count: SessionCart::load(session).await.count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_add_form_defaults_quantity() {
        let parsed = AddToCart::from_form(&form(&[("product_id", "p1")])).unwrap();
        assert_eq!(parsed.product_id, ProductId::new("p1"));
        assert_eq!(parsed.quantity.get(), 1);
        assert!(parsed.variant.is_none());
    }

    #[test]
    fn test_add_form_collects_variants() {
        let parsed = AddToCart::from_form(&form(&[
            ("product_id", "p1"),
            ("quantity", "3"),
            ("variant.Colors", "Black"),
            ("variant.Sizes", "M"),
            ("variant.", "ignored"),
            ("csrf", "x"),
        ]))
        .unwrap();

        assert_eq!(parsed.quantity.get(), 3);
        let variant = parsed.variant.unwrap();
        assert_eq!(variant.len(), 2);
        assert_eq!(variant["Colors"], "Black");
        assert_eq!(format_variant(&variant), "Colors: Black, Sizes: M");
    }

    #[test]
    fn test_add_form_rejects_bad_input() {
        assert!(AddToCart::from_form(&form(&[("quantity", "1")])).is_err());
        assert!(AddToCart::from_form(&form(&[("product_id", "p1"), ("quantity", "0")])).is_err());
        assert!(AddToCart::from_form(&form(&[("product_id", "p1"), ("quantity", "-2")])).is_err());
    }

    #[test]
    fn test_line_view_for_missing_product() {
        let line = CartLineItem {
            product_id: ProductId::new("gone"),
            quantity: 2,
            variant: None,
        };
        let view = CartLineView::new(&line, None);
        assert_eq!(view.name, "Product unavailable");
        assert!(view.line_price.is_none());
    }

    #[test]
    fn test_line_view_prices() {
        let line = CartLineItem {
            product_id: ProductId::new("p1"),
            quantity: 3,
            variant: None,
        };
        let product = Product {
            id: ProductId::new("p1"),
            name: "Mug".to_string(),
            description: String::new(),
            price: Decimal::new(1250, 2),
            images: Vec::new(),
            category: "Home".to_string(),
            variants: None,
        };
        let view = CartLineView::new(&line, Some(&product));
        assert_eq!(view.unit_price.as_deref(), Some("$12.50"));
        assert_eq!(view.line_price.as_deref(), Some("$37.50"));
    }
}
