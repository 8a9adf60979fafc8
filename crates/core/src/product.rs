//! Catalog product shape used throughout the storefront.
//!
//! Products are built from upstream catalog records at the client boundary
//! and are read-only afterwards. The cart refers to them only by
//! [`ProductId`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as shown in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in dollars; never negative.
    pub price: Decimal,
    pub images: Vec<ProductImage>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantGroup>>,
}

impl Product {
    /// Unit price as a displayable [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// The first image, used for cards and cart thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// Variant groups, empty when the product has none.
    #[must_use]
    pub fn variant_groups(&self) -> &[VariantGroup] {
        self.variants.as_deref().unwrap_or_default()
    }
}

/// Product image with layout hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    /// Short keyword hint describing the image contents.
    pub hint: String,
}

/// A selectable product attribute (e.g., "Size") and its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub options: Vec<VariantOption>,
}

/// One value of a variant group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<Decimal>,
}
