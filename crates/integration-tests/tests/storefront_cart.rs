//! Integration tests for the storefront cart flows.
//!
//! These tests require:
//! - The pharmacy REST backend running with at least one active product
//! - The storefront running (cargo run -p botica-storefront)
//!
//! Run with: cargo test -p botica-integration-tests -- --ignored

use botica_integration_tests::{session_client, storefront_base_url};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_health() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_cart_starts_empty() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/carrito"))
        .send()
        .await
        .expect("Failed to load cart page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Tu carrito esta vacio"));
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_add_then_remove_updates_badge() {
    let client = session_client();
    let base_url = storefront_base_url();

    // Add product 1 twice; badge fragment should show the count
    let resp = client
        .post(format!("{base_url}/carrito/agregar"))
        .form(&[("product_id", "1"), ("quantity", "2")])
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let badge = resp.text().await.expect("body");
    assert!(badge.contains("(2)"));

    // Remove the line; cart page shows empty again
    let resp = client
        .post(format!("{base_url}/carrito/quitar"))
        .form(&[("product_id", "1")])
        .send()
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let fragment = resp.text().await.expect("body");
    assert!(fragment.contains("Tu carrito esta vacio"));
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_quantity_below_one_clamps() {
    let client = session_client();
    let base_url = storefront_base_url();

    client
        .post(format!("{base_url}/carrito/agregar"))
        .form(&[("product_id", "1"), ("quantity", "3")])
        .send()
        .await
        .expect("Failed to add to cart");

    // Direct numeric input of 0 clamps to 1, never removes the line
    let resp = client
        .post(format!("{base_url}/carrito/actualizar"))
        .form(&[("product_id", "1"), ("quantity", "0")])
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let badge = client
        .get(format!("{base_url}/carrito/badge"))
        .send()
        .await
        .expect("Failed to load badge")
        .text()
        .await
        .expect("body");
    assert!(badge.contains("(1)"));
}
