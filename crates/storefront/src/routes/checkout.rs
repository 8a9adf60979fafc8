//! Checkout route handlers.
//!
//! The form is validated server-side. No payment is processed: a valid
//! submission is confirmed and the cart emptied.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use haqq_core::OrderSummary;

use crate::error::add_breadcrumb;
use crate::routes::cart::{CartLineView, line_views};
use crate::services::cart::{SessionCart, log_save, resolve_products};
use crate::services::checkout::{CheckoutForm, FieldErrors, OrderConfirmation};
use crate::state::AppState;

/// Order summary display data for templates.
#[derive(Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
}

impl From<&OrderSummary> for SummaryView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            subtotal: summary.subtotal_price().display(),
            tax: summary.tax_price().display(),
            shipping: summary.shipping_price().display(),
            total: summary.total_price().display(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub lines: Vec<CartLineView>,
    pub summary: SummaryView,
    pub form: CheckoutForm,
    pub errors: FieldErrors,
    pub cart_count: u64,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order_id: String,
    pub placed_at: String,
    pub line_count: usize,
    pub total: String,
    pub cart_count: u64,
}

/// Render the checkout page for a non-empty cart.
async fn checkout_page(
    state: &AppState,
    cart: &SessionCart,
    form: CheckoutForm,
    errors: FieldErrors,
) -> Option<CheckoutTemplate> {
    let products = resolve_products(state.printify(), cart.items()).await;
    let summary = OrderSummary::calculate(cart.items(), &products)?;

    Some(CheckoutTemplate {
        lines: line_views(cart.items(), &products),
        summary: SummaryView::from(&summary),
        form,
        errors,
        cart_count: cart.count(),
    })
}

/// Display checkout page. An empty cart redirects to the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    let cart = SessionCart::load(session).await;

    match checkout_page(&state, &cart, CheckoutForm::blank(), FieldErrors::default()).await {
        Some(page) => page.into_response(),
        None => Redirect::to("/cart").into_response(),
    }
}

/// Place the order.
///
/// Invalid forms re-render with field errors and a 422 status. Card fields
/// are never logged or echoed back.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let mut cart = SessionCart::load(session).await;

    if let Err(errors) = form.validate() {
        tracing::info!(fields = ?errors.fields().collect::<Vec<_>>(), "Checkout form rejected");
        return match checkout_page(&state, &cart, form.without_card_data(), errors).await {
            Some(page) => (StatusCode::UNPROCESSABLE_ENTITY, page).into_response(),
            None => Redirect::to("/cart").into_response(),
        };
    }

    let products = resolve_products(state.printify(), cart.items()).await;
    let Some(summary) = OrderSummary::calculate(cart.items(), &products) else {
        return Redirect::to("/cart").into_response();
    };

    let confirmation = OrderConfirmation::new(cart.items().len(), summary.total);
    log_save(&cart.store_mut().clear_cart());
    cart.commit().await;

    add_breadcrumb("checkout", "Order placed", None);
    tracing::info!(
        order_id = %confirmation.order_id,
        lines = confirmation.line_count,
        total = %confirmation.total,
        "Order placed"
    );

    ConfirmationTemplate {
        order_id: confirmation.order_id.to_string(),
        placed_at: confirmation.placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        line_count: confirmation.line_count,
        total: confirmation.total_display(),
        cart_count: 0,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_summary_view_formats_reference_order() {
        let summary = OrderSummary {
            subtotal: Decimal::new(2500, 2),
            tax: Decimal::new(200, 2),
            shipping: Decimal::new(500, 2),
            total: Decimal::new(3200, 2),
        };
        let view = SummaryView::from(&summary);
        assert_eq!(view.subtotal, "$25.00");
        assert_eq!(view.tax, "$2.00");
        assert_eq!(view.shipping, "$5.00");
        assert_eq!(view.total, "$32.00");
    }
}
