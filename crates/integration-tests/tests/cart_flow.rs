//! Cart mutations persisted in the visitor's session.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use haqq_integration_tests::{TestContext, mount_catalog, printify_product};

async fn context() -> TestContext {
    let ctx = TestContext::new(None).await;
    mount_catalog(
        &ctx.printify,
        &[
            printify_product("p1", "Seeker Mug", 1200, &["Home & Living"]),
            printify_product("p2", "Canvas Tote", 1800, &["Accessories"]),
        ],
    )
    .await;
    ctx
}

#[tokio::test]
async fn test_empty_cart() {
    let ctx = context().await;
    let mut visitor = ctx.visitor();

    let resp = visitor.get("/cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty."));

    let count = visitor.get("/cart/count").await;
    assert!(count.body.contains(">0<"));
}

#[tokio::test]
async fn test_add_redirects_back_to_product() {
    let ctx = context().await;
    let mut visitor = ctx.visitor();

    let resp = visitor
        .post_form("/cart/add", &[("product_id", "p1"), ("quantity", "2")])
        .await;

    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/products/p1?added=1"));

    let cart = visitor.get("/cart").await;
    assert!(cart.body.contains("Seeker Mug"));
    assert!(cart.body.contains("$24.00"));
    assert!(visitor.get("/cart/count").await.body.contains(">2<"));
}

#[tokio::test]
async fn test_adding_same_product_merges_quantity() {
    let ctx = context().await;
    let mut visitor = ctx.visitor();

    visitor
        .post_form("/cart/add", &[("product_id", "p1"), ("variant.Sizes", "M")])
        .await;
    visitor
        .post_form(
            "/cart/add",
            &[("product_id", "p1"), ("quantity", "2"), ("variant.Sizes", "S")],
        )
        .await;

    let cart = visitor.get("/cart").await;
    assert!(cart.body.contains("Sizes: M"));
    assert!(!cart.body.contains("Sizes: S"));
    assert!(cart.body.contains("$36.00"));
    assert!(visitor.get("/cart/count").await.body.contains(">3<"));
}

#[tokio::test]
async fn test_update_and_remove() {
    let ctx = context().await;
    let mut visitor = ctx.visitor();

    visitor.post_form("/cart/add", &[("product_id", "p1")]).await;
    visitor.post_form("/cart/add", &[("product_id", "p2")]).await;

    let resp = visitor
        .post_form("/cart/update", &[("product_id", "p1"), ("quantity", "5")])
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/cart"));
    assert!(visitor.get("/cart").await.body.contains("$78.00"));

    visitor
        .post_form("/cart/update", &[("product_id", "p1"), ("quantity", "0")])
        .await;
    let cart = visitor.get("/cart").await;
    assert!(!cart.body.contains("Seeker Mug"));
    assert!(cart.body.contains("Canvas Tote"));

    visitor.post_form("/cart/remove", &[("product_id", "p2")]).await;
    assert!(visitor.get("/cart").await.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_clear() {
    let ctx = context().await;
    let mut visitor = ctx.visitor();

    visitor.post_form("/cart/add", &[("product_id", "p1")]).await;
    visitor.post_form("/cart/add", &[("product_id", "p2")]).await;

    let resp = visitor.post_form("/cart/clear", &[]).await;
    assert_eq!(resp.location(), Some("/cart"));
    assert!(visitor.get("/cart").await.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_rejects_invalid_form() {
    let ctx = context().await;
    let mut visitor = ctx.visitor();

    let missing_id = visitor.post_form("/cart/add", &[("quantity", "1")]).await;
    assert_eq!(missing_id.status, StatusCode::BAD_REQUEST);

    let zero = visitor
        .post_form("/cart/add", &[("product_id", "p1"), ("quantity", "0")])
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let ctx = context().await;
    let mut alice = ctx.visitor();
    let mut bob = ctx.visitor();

    alice.post_form("/cart/add", &[("product_id", "p1")]).await;

    assert!(alice.get("/cart").await.body.contains("Seeker Mug"));
    assert!(bob.get("/cart").await.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_unavailable_product_still_listed() {
    let ctx = context().await;
    let mut visitor = ctx.visitor();

    visitor.post_form("/cart/add", &[("product_id", "retired")]).await;

    let cart = visitor.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    assert!(cart.body.contains("Product unavailable"));
}
