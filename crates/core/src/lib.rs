//! Haqq Core - Cart, pricing and catalog types.
//!
//! This crate holds the storefront's domain logic:
//! - [`cart`] - The visitor's cart with write-through persistence
//! - [`pricing`] - Subtotal, tax, shipping and total for checkout
//! - [`product`] - Catalog product shape
//! - [`types`] - Newtype IDs and prices
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no HTTP
//! clients and no storage backends beyond an in-memory one. Storage is reached
//! through the [`cart::CartPersistence`] port so the web layer can plug in its
//! own session-backed store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod product;
pub mod types;

pub use cart::{CartLineItem, CartStore, VariantSelection};
pub use pricing::OrderSummary;
pub use product::{Product, ProductImage, VariantGroup, VariantOption};
pub use types::*;
