//! Integration tests for the Haqq Apparel storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p haqq-integration-tests
//! ```
//!
//! Tests drive the full storefront router in-process with
//! [`tower::ServiceExt::oneshot`]. Printify is replaced by a `wiremock`
//! server and recommendations by [`FixedRanker`], so no credentials or
//! network access are needed.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use haqq_core::ProductId;
use haqq_storefront::config::{PrintifyConfig, StorefrontConfig};
use haqq_storefront::recommendations::{
    ProductRanker, RankingRequest, RankingResponse, RecommendationError,
};
use haqq_storefront::state::AppState;

/// Shop id used by every mocked catalog.
pub const SHOP_ID: &str = "42";

// =============================================================================
// Catalog fixtures
// =============================================================================

/// A Printify product record with one default variant.
#[must_use]
pub fn printify_product(id: &str, title: &str, price_cents: i64, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "tags": tags,
        "options": [{
            "name": "Sizes",
            "type": "size",
            "values": [{"id": 1, "title": "S"}, {"id": 2, "title": "M"}]
        }],
        "variants": [
            {"id": 1, "price": price_cents, "title": "S", "is_enabled": true, "is_default": true, "options": [1]},
            {"id": 2, "price": price_cents, "title": "M", "is_enabled": true, "is_default": false, "options": [2]}
        ],
        "images": [{"src": format!("https://images.printify.com/{id}.png"), "is_default": true}],
        "visible": true
    })
}

/// Serve `products` as a single-page listing plus one detail route each.
pub async fn mount_catalog(server: &MockServer, products: &[Value]) {
    Mock::given(method("GET"))
        .and(path(format!("/shops/{SHOP_ID}/products.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_page": 1,
            "last_page": 1,
            "data": products,
        })))
        .mount(server)
        .await;

    for product in products {
        let id = product["id"].as_str().unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/shops/{SHOP_ID}/products/{id}.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(product))
            .mount(server)
            .await;
    }
}

/// Make every catalog request fail with `status`.
pub async fn mount_failing_catalog(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
        .mount(server)
        .await;
}

// =============================================================================
// Recommendation stub
// =============================================================================

/// Ranker that always answers with the same ids.
pub struct FixedRanker {
    ids: Vec<ProductId>,
}

impl FixedRanker {
    #[must_use]
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| ProductId::new(*id)).collect(),
        }
    }
}

#[async_trait]
impl ProductRanker for FixedRanker {
    async fn rank(&self, _request: &RankingRequest) -> Result<RankingResponse, RecommendationError> {
        Ok(RankingResponse {
            recommended_product_ids: self.ids.clone(),
        })
    }
}

// =============================================================================
// TestContext
// =============================================================================

/// A storefront wired to a mock Printify server.
pub struct TestContext {
    pub printify: MockServer,
    app: Router,
}

impl TestContext {
    /// Start a mock Printify server and build the storefront around it.
    pub async fn new(ranker: Option<Arc<dyn ProductRanker>>) -> Self {
        let printify = MockServer::start().await;
        let state = AppState::with_ranker(config(&printify.uri()), ranker);

        Self {
            printify,
            app: haqq_storefront::app(state),
        }
    }

    /// A visitor with its own session cookie jar.
    #[must_use]
    pub fn visitor(&self) -> Visitor {
        Visitor {
            app: self.app.clone(),
            cookie: None,
        }
    }
}

fn config(printify_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        printify: PrintifyConfig {
            api_url: printify_url.to_string(),
            api_token: SecretString::from("test-printify-token"),
            shop_id: Some(SHOP_ID.to_string()),
            cache_ttl: Duration::from_secs(60),
        },
        recommendations: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

// =============================================================================
// Visitor
// =============================================================================

/// Sends requests through the router, carrying the session cookie between
/// them the way a browser would.
pub struct Visitor {
    app: Router,
    cookie: Option<String>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

impl Visitor {
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Post a URL-encoded form.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
