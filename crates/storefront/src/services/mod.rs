//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart storage and product resolution
//! - `checkout` - Checkout form validation and order confirmation

pub mod cart;
pub mod checkout;
