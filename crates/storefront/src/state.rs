//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::printify::PrintifyClient;
use crate::recommendations::{ClaudeRanker, ProductRanker, RecommendationGateway};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog client, the recommendation gateway and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    printify: PrintifyClient,
    recommendations: RecommendationGateway,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Recommendations use Claude when an Anthropic key is configured and
    /// are disabled otherwise.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let ranker = config
            .recommendations
            .as_ref()
            .map(|c| Arc::new(ClaudeRanker::new(c)) as Arc<dyn ProductRanker>);
        Self::with_ranker(config, ranker)
    }

    /// Create application state with an explicit ranker.
    #[must_use]
    pub fn with_ranker(config: StorefrontConfig, ranker: Option<Arc<dyn ProductRanker>>) -> Self {
        let printify = PrintifyClient::new(&config.printify);
        let recommendations = ranker.map_or_else(RecommendationGateway::disabled, |ranker| {
            RecommendationGateway::new(ranker)
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                printify,
                recommendations,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Printify catalog client.
    #[must_use]
    pub fn printify(&self) -> &PrintifyClient {
        &self.inner.printify
    }

    /// Get a reference to the recommendation gateway.
    #[must_use]
    pub fn recommendations(&self) -> &RecommendationGateway {
        &self.inner.recommendations
    }
}
