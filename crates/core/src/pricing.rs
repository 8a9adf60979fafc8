//! Checkout pricing.
//!
//! Totals are computed with exact decimals. Nothing is rounded until a value
//! is formatted with [`Price::display`](crate::Price::display).

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::CartLineItem;
use crate::product::Product;
use crate::types::{Price, ProductId};

/// Sales tax applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Flat shipping fee charged on every non-empty order.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Price breakdown for a cart at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Price a cart against the products that could be resolved.
    ///
    /// Lines whose product is missing from `products` contribute nothing.
    /// Returns `None` for an empty cart, which has nothing to check out.
    #[must_use]
    pub fn calculate(
        items: &[CartLineItem],
        products: &HashMap<ProductId, Product>,
    ) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let subtotal: Decimal = items
            .iter()
            .filter_map(|line| {
                products
                    .get(&line.product_id)
                    .map(|product| line_total(line, product))
            })
            .sum();
        let tax = subtotal * TAX_RATE;
        let shipping = SHIPPING_FEE;

        Some(Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        })
    }

    #[must_use]
    pub const fn subtotal_price(&self) -> Price {
        Price::usd(self.subtotal)
    }

    #[must_use]
    pub const fn tax_price(&self) -> Price {
        Price::usd(self.tax)
    }

    #[must_use]
    pub const fn shipping_price(&self) -> Price {
        Price::usd(self.shipping)
    }

    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::usd(self.total)
    }
}

/// Cost of one cart line: quantity times unit price.
#[must_use]
pub fn line_total(line: &CartLineItem, product: &Product) -> Decimal {
    product.price * Decimal::from(line.quantity)
}

/// Subtotal of the resolvable lines, for cart pages that show no tax or
/// shipping yet.
#[must_use]
pub fn subtotal(items: &[CartLineItem], products: &HashMap<ProductId, Product>) -> Decimal {
    OrderSummary::calculate(items, products).map_or(Decimal::ZERO, |summary| summary.subtotal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            description: String::new(),
            price,
            images: Vec::new(),
            category: "Uncategorized".to_string(),
            variants: None,
        }
    }

    fn line(id: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            quantity,
            variant: None,
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<ProductId, Product> {
        products.into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    #[test]
    fn test_constants() {
        assert_eq!(TAX_RATE, Decimal::new(8, 2));
        assert_eq!(SHIPPING_FEE, Decimal::new(5, 0));
    }

    #[test]
    fn test_reference_order() {
        let products = catalog(vec![
            product("a", Decimal::new(1000, 2)),
            product("b", Decimal::new(500, 2)),
        ]);
        let items = [line("a", 2), line("b", 1)];

        let summary = OrderSummary::calculate(&items, &products).unwrap();

        assert_eq!(summary.subtotal, Decimal::new(25, 0));
        assert_eq!(summary.tax, Decimal::new(2, 0));
        assert_eq!(summary.shipping, Decimal::new(5, 0));
        assert_eq!(summary.total, Decimal::new(32, 0));
        assert_eq!(summary.total_price().display(), "$32.00");
    }

    #[test]
    fn test_empty_cart_has_no_summary() {
        assert!(OrderSummary::calculate(&[], &HashMap::new()).is_none());
        assert_eq!(subtotal(&[], &HashMap::new()), Decimal::ZERO);
    }

    #[test]
    fn test_unresolved_products_contribute_zero() {
        let products = catalog(vec![product("a", Decimal::new(1000, 2))]);
        let items = [line("a", 1), line("missing", 4)];

        let summary = OrderSummary::calculate(&items, &products).unwrap();

        assert_eq!(summary.subtotal, Decimal::new(10, 0));
        assert_eq!(summary.total, Decimal::new(1580, 2));
    }

    #[test]
    fn test_shipping_charged_even_when_nothing_resolves() {
        let items = [line("missing", 1)];
        let summary = OrderSummary::calculate(&items, &HashMap::new()).unwrap();

        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.total, SHIPPING_FEE);
    }

    #[test]
    fn test_no_intermediate_rounding() {
        // 3 x 3.335 = 10.005; tax 0.8004. Rounding per line would drift.
        let products = catalog(vec![product("a", Decimal::new(3335, 3))]);
        let items = [line("a", 3)];

        let summary = OrderSummary::calculate(&items, &products).unwrap();

        assert_eq!(summary.subtotal, Decimal::new(10_005, 3));
        assert_eq!(summary.tax, Decimal::new(80_040, 5));
        assert_eq!(summary.total, Decimal::new(1_580_540, 5));
        assert_eq!(summary.total_price().display(), "$15.81");
    }
}
