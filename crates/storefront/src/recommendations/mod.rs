//! "You might also like" recommendations.
//!
//! The ranking itself is opaque: a [`ProductRanker`] receives the current
//! product and the rest of the catalog and answers with product ids. The
//! [`RecommendationGateway`] wraps it so that callers only ever see a list of
//! products, possibly empty, and never an error.

mod claude;

pub use claude::ClaudeRanker;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use haqq_core::{Product, ProductId};

/// Most recommendations shown for one product.
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Errors a ranker can report. The gateway logs and discards them.
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The ranking service returned an error.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type reported by the service.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the ranking service.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The reply could not be understood.
    #[error("parse error: {0}")]
    Parse(String),
}

// =============================================================================
// Ranking contract
// =============================================================================

/// The product being viewed, as sent to a ranker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
}

/// A candidate product, as sent to a ranker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub id: ProductId,
    pub name: String,
}

/// Input to a ranker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRequest {
    pub current_product: CurrentProduct,
    pub all_products: Vec<CandidateProduct>,
}

impl RankingRequest {
    /// Build a request for `current`, listing every other catalog product.
    #[must_use]
    pub fn new(current: &Product, catalog: &[Product]) -> Self {
        Self {
            current_product: CurrentProduct {
                id: current.id.clone(),
                name: current.name.clone(),
                description: current.description.clone(),
                category: current.category.clone(),
            },
            all_products: catalog
                .iter()
                .filter(|p| p.id != current.id)
                .map(|p| CandidateProduct {
                    id: p.id.clone(),
                    name: p.name.clone(),
                })
                .collect(),
        }
    }
}

/// A ranker's answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    #[serde(default)]
    pub recommended_product_ids: Vec<ProductId>,
}

/// Something that picks similar products.
#[async_trait]
pub trait ProductRanker: Send + Sync {
    /// Rank candidates for the current product.
    async fn rank(&self, request: &RankingRequest) -> Result<RankingResponse, RecommendationError>;
}

// =============================================================================
// Gateway
// =============================================================================

/// Fault-tolerant front for an optional [`ProductRanker`].
#[derive(Clone, Default)]
pub struct RecommendationGateway {
    ranker: Option<Arc<dyn ProductRanker>>,
}

impl RecommendationGateway {
    /// Gateway backed by `ranker`.
    #[must_use]
    pub fn new(ranker: Arc<dyn ProductRanker>) -> Self {
        Self {
            ranker: Some(ranker),
        }
    }

    /// Gateway that never recommends anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { ranker: None }
    }

    /// Whether a ranker is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.ranker.is_some()
    }

    /// Up to [`MAX_RECOMMENDATIONS`] catalog products similar to `current`.
    ///
    /// Ranker order is kept. Ids naming the current product, repeated ids and
    /// ids missing from the catalog are dropped. Ranker failures yield an
    /// empty list.
    #[instrument(skip_all, fields(product_id = %current.id))]
    pub async fn recommend(&self, current: &Product, catalog: &[Product]) -> Vec<Product> {
        let Some(ranker) = &self.ranker else {
            return Vec::new();
        };

        let request = RankingRequest::new(current, catalog);
        if request.all_products.is_empty() {
            return Vec::new();
        }

        let response = match ranker.rank(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Product recommendation failed");
                return Vec::new();
            }
        };

        let picked = select(current, catalog, &response.recommended_product_ids);
        debug!(
            requested = response.recommended_product_ids.len(),
            returned = picked.len(),
            "Recommendations resolved"
        );
        picked
    }
}

/// Resolve ranked ids against the catalog.
fn select(current: &Product, catalog: &[Product], ids: &[ProductId]) -> Vec<Product> {
    let mut seen = HashSet::new();

    ids.iter()
        .filter(|id| **id != current.id)
        .filter(|id| seen.insert(*id))
        .filter_map(|id| catalog.iter().find(|p| &p.id == id))
        .take(MAX_RECOMMENDATIONS)
        .cloned()
        .collect()
}
