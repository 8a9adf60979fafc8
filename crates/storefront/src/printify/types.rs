//! Raw Printify API records.
//!
//! These mirror the JSON returned by the Printify REST API closely enough to
//! deserialize it. Fields the storefront never reads are left out and ignored
//! by serde. Convert with [`super::conversions`] before use.

use serde::Deserialize;

/// A shop connected to the Printify account.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyShop {
    pub id: u64,
    pub title: String,
    pub sales_channel: String,
}

/// One page of `GET /shops/{shop_id}/products.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyProductPage {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    pub data: Vec<PrintifyProduct>,
}

impl PrintifyProductPage {
    /// Whether more pages follow this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        match (self.current_page, self.last_page) {
            (Some(current), Some(last)) => current < last,
            _ => false,
        }
    }
}

/// A product as stored by Printify.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyProduct {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub options: Vec<PrintifyOption>,
    #[serde(default)]
    pub variants: Vec<PrintifyVariant>,
    #[serde(default)]
    pub images: Vec<PrintifyImage>,
    #[serde(default)]
    pub visible: bool,
}

/// An option group such as "Sizes" or "Colors".
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyOption {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub values: Vec<PrintifyOptionValue>,
}

/// One value of an option group.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyOptionValue {
    pub id: u64,
    pub title: String,
}

/// A purchasable variant. Prices are integer minor units (cents).
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyVariant {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub options: Vec<u64>,
}

/// A mockup image.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyImage {
    pub src: String,
    #[serde(default)]
    pub variant_ids: Vec<u64>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub is_default: bool,
}
