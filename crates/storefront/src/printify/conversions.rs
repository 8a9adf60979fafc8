//! Printify record to storefront product conversion.
//!
//! Conversion is pure: the same record always yields the same product.

use haqq_core::{CurrencyCode, Price, Product, ProductId, ProductImage, VariantGroup, VariantOption};

use super::types::{PrintifyImage, PrintifyOption, PrintifyProduct};

/// Category used when a product has no tags.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Image hint used when a product has no tags.
pub const DEFAULT_IMAGE_HINT: &str = "product image";

/// Printify does not report mockup dimensions; its mockups are square.
const MOCKUP_SIZE: u32 = 1000;

/// Convert a Printify product into the storefront shape.
///
/// The price is the default variant's price (Printify stores cents). Option
/// groups become variant groups carrying only their value labels; per-variant
/// price differences are not carried over.
#[must_use]
pub fn convert_product(product: PrintifyProduct) -> Product {
    let price = product
        .variants
        .iter()
        .find(|v| v.is_default)
        .map_or_else(Default::default, |v| {
            Price::from_minor_units(v.price, CurrencyCode::USD).amount
        });

    let hint = if product.tags.is_empty() {
        DEFAULT_IMAGE_HINT.to_string()
    } else {
        product.tags.join(" ")
    };

    let category = product
        .tags
        .first()
        .cloned()
        .unwrap_or_else(|| UNCATEGORIZED.to_string());

    let images = product
        .images
        .into_iter()
        .map(|image| convert_image(image, &product.title, &hint))
        .collect();

    let variants = product.options.into_iter().map(convert_option).collect();

    Product {
        id: ProductId::new(product.id),
        name: product.title,
        description: product.description,
        price,
        images,
        category,
        variants: Some(variants),
    }
}

fn convert_image(image: PrintifyImage, title: &str, hint: &str) -> ProductImage {
    ProductImage {
        src: image.src,
        alt: title.to_string(),
        width: MOCKUP_SIZE,
        height: MOCKUP_SIZE,
        hint: hint.to_string(),
    }
}

fn convert_option(option: PrintifyOption) -> VariantGroup {
    VariantGroup {
        kind: option.name,
        options: option
            .values
            .into_iter()
            .map(|value| VariantOption {
                value: value.title,
                price_modifier: None,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::printify::types::{PrintifyOptionValue, PrintifyVariant};

    fn variant(id: u64, price: i64, is_default: bool) -> PrintifyVariant {
        PrintifyVariant {
            id,
            sku: None,
            price,
            title: format!("Variant {id}"),
            is_enabled: true,
            is_default,
            is_available: true,
            options: Vec::new(),
        }
    }

    fn printify_product() -> PrintifyProduct {
        PrintifyProduct {
            id: "5f1c".to_string(),
            title: "Geometric Star Hoodie".to_string(),
            description: "Warm hoodie".to_string(),
            tags: vec!["Hoodies".to_string(), "Winter".to_string()],
            options: vec![PrintifyOption {
                name: "Sizes".to_string(),
                kind: "size".to_string(),
                values: vec![
                    PrintifyOptionValue {
                        id: 14,
                        title: "S".to_string(),
                    },
                    PrintifyOptionValue {
                        id: 15,
                        title: "M".to_string(),
                    },
                ],
            }],
            variants: vec![variant(1, 3999, false), variant(2, 4499, true)],
            images: vec![PrintifyImage {
                src: "https://images-api.printify.com/mockup/1.jpg".to_string(),
                variant_ids: vec![1, 2],
                position: "front".to_string(),
                is_default: true,
            }],
            visible: true,
        }
    }

    #[test]
    fn test_convert_product_uses_default_variant_price() {
        let product = convert_product(printify_product());

        assert_eq!(product.id, ProductId::new("5f1c"));
        assert_eq!(product.name, "Geometric Star Hoodie");
        assert_eq!(product.price, Decimal::new(4499, 2));
        assert_eq!(product.category, "Hoodies");
    }

    #[test]
    fn test_convert_product_without_default_variant_is_free() {
        let mut raw = printify_product();
        raw.variants = vec![variant(1, 3999, false)];

        assert_eq!(convert_product(raw).price, Decimal::ZERO);
    }

    #[test]
    fn test_convert_product_images() {
        let product = convert_product(printify_product());
        let image = &product.images[0];

        assert_eq!(image.alt, "Geometric Star Hoodie");
        assert_eq!((image.width, image.height), (1000, 1000));
        assert_eq!(image.hint, "Hoodies Winter");
    }

    #[test]
    fn test_convert_product_without_tags_uses_placeholders() {
        let mut raw = printify_product();
        raw.tags.clear();
        let product = convert_product(raw);

        assert_eq!(product.category, UNCATEGORIZED);
        assert_eq!(product.images[0].hint, DEFAULT_IMAGE_HINT);
    }

    #[test]
    fn test_convert_product_options_drop_price_modifiers() {
        let product = convert_product(printify_product());
        let groups = product.variant_groups();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, "Sizes");
        let values: Vec<_> = groups[0].options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["S", "M"]);
        assert!(groups[0].options.iter().all(|o| o.price_modifier.is_none()));
    }

    #[test]
    fn test_convert_product_is_deterministic() {
        let first = serde_json::to_string(&convert_product(printify_product())).expect("json");
        let second = serde_json::to_string(&convert_product(printify_product())).expect("json");
        assert_eq!(first, second);
    }
}
