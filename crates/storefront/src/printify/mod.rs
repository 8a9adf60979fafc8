//! Printify catalog client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` with a bearer token
//! - Printify is the source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for API responses (1 hour TTL by default)
//! - Raw Printify records live in [`types`] and are converted to
//!   [`haqq_core::Product`] inside this module; nothing outside it sees the
//!   upstream shape
//!
//! # Example
//!
//! ```rust,ignore
//! use haqq_storefront::printify::PrintifyClient;
//!
//! let client = PrintifyClient::new(&config.printify);
//!
//! // Every product in the shop
//! let products = client.list_products().await?;
//!
//! // A single product
//! let product = client.get_product(&products[0].id).await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod types;

pub use client::PrintifyClient;

/// Origins that serve Printify product mockups.
pub const IMAGE_ORIGINS: &[&str] = &[
    "https://images.printify.com",
    "https://images-api.printify.com",
];

use thiserror::Error;

/// Errors that can occur when talking to Printify.
#[derive(Debug, Error)]
pub enum PrintifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API token was rejected.
    #[error("Unauthorized: check PRINTIFY_API_KEY")]
    Unauthorized,

    /// Rate limited by Printify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The account has no shops to sell from.
    #[error("No Printify shops found for this API key")]
    NoShops,

    /// Any other non-success response.
    #[error("Printify returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },
}

impl PrintifyError {
    /// Whether the error means the requested product does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
