//! JSON API endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use haqq_integration_tests::{TestContext, mount_catalog, mount_failing_catalog, printify_product};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_product_json() {
    let ctx = TestContext::new(None).await;
    mount_catalog(
        &ctx.printify,
        &[printify_product("p1", "Seeker Mug", 2499, &["Home & Living", "Mugs"])],
    )
    .await;

    let resp = ctx.visitor().get("/api/products/p1").await;

    assert_eq!(resp.status, StatusCode::OK);
    let json = resp.json();
    assert_eq!(json["id"], "p1");
    assert_eq!(json["name"], "Seeker Mug");
    assert_eq!(json["price"], "24.99");
    assert_eq!(json["category"], "Home & Living");
    assert_eq!(json["images"][0]["width"], 1000);
    assert_eq!(json["images"][0]["hint"], "Home & Living Mugs");
    assert_eq!(json["variants"][0]["type"], "Sizes");
    assert_eq!(json["variants"][0]["options"][1]["value"], "M");
}

#[tokio::test]
async fn test_missing_product_json() {
    let ctx = TestContext::new(None).await;
    mount_catalog(&ctx.printify, &[]).await;

    let resp = ctx.visitor().get("/api/products/nope").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json(), serde_json::json!({"message": "Product not found"}));
}

#[tokio::test]
async fn test_upstream_failure_json() {
    let ctx = TestContext::new(None).await;
    mount_failing_catalog(&ctx.printify, 502).await;

    let resp = ctx.visitor().get("/api/products/p1").await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.json(), serde_json::json!({"message": "Failed to fetch product"}));
}

#[tokio::test]
async fn test_product_id_cannot_leave_configured_shop() {
    let ctx = TestContext::new(None).await;
    mount_catalog(&ctx.printify, &[printify_product("p1", "Seeker Mug", 1200, &[])]).await;
    Mock::given(method("GET"))
        .and(path("/shops/99/products/secret.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(printify_product("secret", "Other Shop Draft", 100, &[])),
        )
        .expect(0)
        .mount(&ctx.printify)
        .await;

    let mut visitor = ctx.visitor();

    let api = visitor.get("/api/products/..%2F..%2F99%2Fproducts%2Fsecret").await;
    assert_eq!(api.status, StatusCode::NOT_FOUND);
    assert_eq!(api.json(), serde_json::json!({"message": "Product not found"}));

    let page = visitor.get("/products/..%2F..%2F99%2Fproducts%2Fsecret").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(!page.body.contains("Other Shop Draft"));

    visitor
        .post_form("/cart/add", &[("product_id", "../../99/products/secret")])
        .await;
    let cart = visitor.get("/cart").await;
    assert!(cart.body.contains("Product unavailable"));
    assert!(!cart.body.contains("Other Shop Draft"));
}
