//! Page rendering against a mocked Printify catalog.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use haqq_integration_tests::{
    FixedRanker, TestContext, mount_catalog, mount_failing_catalog, printify_product,
};

fn catalog() -> Vec<serde_json::Value> {
    vec![
        printify_product("p1", "Seeker Mug", 1200, &["Home & Living"]),
        printify_product("p2", "Canvas Tote", 1800, &["Accessories"]),
        printify_product("p3", "Prayer Journal", 2400, &[]),
    ]
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new(None).await;
    let resp = ctx.visitor().get("/health").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_home_lists_products() {
    let ctx = TestContext::new(None).await;
    mount_catalog(&ctx.printify, &catalog()).await;

    let resp = ctx.visitor().get("/").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Seeker Mug"));
    assert!(resp.body.contains("Canvas Tote"));
    assert!(resp.body.contains("$12.00"));
    assert!(resp.body.contains("Uncategorized"));
    assert!(resp.body.contains("href=\"/products/p2\""));
    assert!(!resp.body.contains("Error Fetching Products"));
}

#[tokio::test]
async fn test_home_shows_banner_when_catalog_fails() {
    let ctx = TestContext::new(None).await;
    mount_failing_catalog(&ctx.printify, 500).await;

    let resp = ctx.visitor().get("/").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Error Fetching Products"));
    assert!(resp.body.contains("load products right now."));
    assert!(resp.body.contains("Printify API key"));
}

#[tokio::test]
async fn test_product_page_renders_details_and_recommendations() {
    let ranker = Arc::new(FixedRanker::new(&["p3", "p1", "unknown", "p3"]));
    let ctx = TestContext::new(Some(ranker)).await;
    mount_catalog(&ctx.printify, &catalog()).await;

    let resp = ctx.visitor().get("/products/p1").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("<title>Seeker Mug | Haqq Apparel</title>"));
    assert!(resp.body.contains("name=\"variant.Sizes\""));
    assert!(resp.body.contains("You Might Also Like"));
    assert!(resp.body.contains("Prayer Journal"));
    assert!(!resp.body.contains("Canvas Tote"));
    assert!(!resp.body.contains("Added to cart."));
}

#[tokio::test]
async fn test_product_page_without_recommendations() {
    let ctx = TestContext::new(None).await;
    mount_catalog(&ctx.printify, &catalog()).await;

    let resp = ctx.visitor().get("/products/p2?added=1").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Added to cart."));
    assert!(!resp.body.contains("You Might Also Like"));
}

#[tokio::test]
async fn test_product_page_accepts_any_added_flag() {
    let ctx = TestContext::new(None).await;
    mount_catalog(&ctx.printify, &catalog()).await;

    let resp = ctx.visitor().get("/products/p2?added=yes").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Added to cart."));
}

#[tokio::test]
async fn test_product_page_shows_banner_when_catalog_fails() {
    let ctx = TestContext::new(None).await;
    mount_failing_catalog(&ctx.printify, 503).await;

    let resp = ctx.visitor().get("/products/p1").await;

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(resp.body.contains("<title>Unavailable | Haqq Apparel</title>"));
    assert!(resp.body.contains("Error Fetching Products"));
    assert!(resp.body.contains("load products right now."));
    assert!(resp.body.contains("Printify API key"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new(None).await;
    mount_catalog(&ctx.printify, &catalog()).await;

    let resp = ctx.visitor().get("/products/missing").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body.contains("Continue Shopping"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new(None).await;
    let resp = ctx.visitor().get("/no/such/page").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let ctx = TestContext::new(None).await;
    let resp = ctx.visitor().get("/health").await;

    let csp = resp.headers["content-security-policy"].to_str().unwrap();
    assert!(csp.contains("images.printify.com"));
    assert!(resp.headers.contains_key("x-request-id"));
    assert_eq!(resp.headers["x-content-type-options"], "nosniff");
}
