//! End-to-end order placement tests.
//!
//! Run with a live server and database:
//!
//! ```bash
//! cargo test -p minimart-integration-tests --test orders -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use minimart_integration_tests::{TestContext, unique_tag};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn place_order_decrements_stock_and_records_details() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let name = format!("order-ok-{}", unique_tag());
    let product_id = ctx.create_product(&name, 100, 5).await;

    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([{"productId": product_id, "quantity": 2}]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let order_id = body["orderId"].as_i64().expect("missing orderId");

    assert_eq!(ctx.stock_quantity(product_id).await, 3);

    let resp = ctx
        .client
        .get(format!("{}/api/orders/{order_id}", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = resp.json().await.unwrap();
    let details = order["orderDetails"].as_array().expect("missing details");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["price"], 100);
    assert_eq!(details[0]["quantity"], 2);
    assert_eq!(details[0]["product"]["name"], name.as_str());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn insufficient_stock_rejects_without_writing() {
    let ctx = TestContext::new().await;
    let user_id = ctx.register_and_login().await;

    let name = format!("order-low-{}", unique_tag());
    let product_id = ctx.create_product(&name, 200, 1).await;
    let orders_before = ctx.order_count(user_id).await;

    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([{"productId": product_id, "quantity": 2}]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Validation Failed");
    assert_eq!(body["errors"], json!([format!("{name} is out of stock")]));

    assert_eq!(ctx.stock_quantity(product_id).await, 1);
    assert_eq!(ctx.order_count(user_id).await, orders_before);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn duplicate_entries_that_jointly_oversell_roll_back_fully() {
    let ctx = TestContext::new().await;
    let user_id = ctx.register_and_login().await;

    let name = format!("order-dup-{}", unique_tag());
    let product_id = ctx.create_product(&name, 100, 5).await;
    let orders_before = ctx.order_count(user_id).await;

    // Each entry passes the stock check individually (3 <= 5); the combined
    // decrement trips the quantity >= 0 constraint and the whole
    // transaction rolls back.
    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([
            {"productId": product_id, "quantity": 3},
            {"productId": product_id, "quantity": 3},
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Internal Server Error");

    assert_eq!(ctx.stock_quantity(product_id).await, 5);
    assert_eq!(ctx.order_count(user_id).await, orders_before);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn order_detail_price_is_frozen_against_catalog_changes() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let name = format!("order-frozen-{}", unique_tag());
    let product_id = ctx.create_product(&name, 100, 5).await;

    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([{"productId": product_id, "quantity": 1}]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let order_id = body["orderId"].as_i64().unwrap();

    ctx.set_product_price(product_id, 999).await;

    let resp = ctx
        .client
        .get(format!("{}/api/orders/{order_id}", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = resp.json().await.unwrap();
    let detail = &order["orderDetails"][0];
    assert_eq!(detail["price"], 100);
    assert_eq!(detail["product"]["price"], 999);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn nonexistent_product_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([{"productId": 999_999_999, "quantity": 1}]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"], json!(["specified product does not exist"]));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn multiple_out_of_stock_items_are_all_reported() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let tag = unique_tag();
    let name_a = format!("order-multi-a-{tag}");
    let name_b = format!("order-multi-b-{tag}");
    let id_a = ctx.create_product(&name_a, 100, 0).await;
    let id_b = ctx.create_product(&name_b, 100, 1).await;

    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([
            {"productId": id_a, "quantity": 1},
            {"productId": id_b, "quantity": 5},
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    let errors = body["errors"].as_array().expect("missing errors");
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(&json!(format!("{name_a} is out of stock"))));
    assert!(errors.contains(&json!(format!("{name_b} is out of stock"))));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn malformed_body_reports_the_first_field_error() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([{"quantity": "two"}]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"], json!(["productId is required"]));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn unauthenticated_order_is_rejected() {
    let ctx = TestContext::new().await;

    // No login on this client; no session cookie is present.
    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([{"productId": 1, "quantity": 1}]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn orders_are_scoped_to_their_owner() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let name = format!("order-scope-{}", unique_tag());
    let product_id = ctx.create_product(&name, 150, 5).await;

    let resp = ctx
        .client
        .post(format!("{}/api/orders", ctx.base_url))
        .json(&json!([{"productId": product_id, "quantity": 1}]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let order_id = body["orderId"].as_i64().unwrap();

    // A different user must not be able to see the order.
    let other = TestContext::new().await;
    other.register_and_login().await;

    let resp = other
        .client
        .get(format!("{}/api/orders/{order_id}", other.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn non_numeric_order_id_is_a_bad_request() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let resp = ctx
        .client
        .get(format!("{}/api/orders/abc", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid order ID");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn order_listing_returns_newest_first() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;

    let tag = unique_tag();
    let first = ctx.create_product(&format!("order-list-a-{tag}"), 100, 5).await;
    let second = ctx.create_product(&format!("order-list-b-{tag}"), 100, 5).await;

    for product_id in [first, second] {
        let resp = ctx
            .client
            .post(format!("{}/api/orders", ctx.base_url))
            .json(&json!([{"productId": product_id, "quantity": 1}]))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = ctx
        .client
        .get(format!("{}/api/orders", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let orders: Value = resp.json().await.unwrap();
    let orders = orders.as_array().expect("expected array");
    assert_eq!(orders.len(), 2);

    // Newest first: the second order covers the second product.
    let newest_details = orders[0]["orderDetails"].as_array().unwrap();
    assert_eq!(
        newest_details[0]["product"]["id"].as_i64().unwrap(),
        i64::from(second)
    );
}
