//! 购物车 → 订单 → 支付 → 销售 流程测试

mod common;

use common::{TestApp, assert_money};
use http::Method;
use serde_json::json;
use shared::models::{GatewayCallback, PaymentMethod, PaymentState};
use shop_server::gateway::{Checkout, GatewayError};
use shop_server::{MockGateway, PaymentGateway};
use std::sync::Arc;

/// Gateway that is always down
struct OfflineGateway;

#[async_trait::async_trait]
impl PaymentGateway for OfflineGateway {
    async fn create_checkout(
        &self,
        _amount: f64,
        _reference: &str,
        _method: PaymentMethod,
    ) -> Result<Checkout, GatewayError> {
        Err(GatewayError::Unavailable("connection refused".into()))
    }

    fn verify(&self, _callback: &GatewayCallback) -> bool {
        false
    }
}

fn gateway() -> MockGateway {
    // Same secret as Config::for_tests
    MockGateway::new("test-gateway-secret", "https://pay.test.local")
}

#[tokio::test]
async fn test_cart_merges_lines_and_checks_stock() {
    let app = TestApp::new().await;
    let token = app.register("cart@shop.test").await;
    let soap = app.product(&token, "Soap", 2.5, 10).await;

    let cart = app.post("/api/carts", &token, json!({})).await;
    let cart_id = cart.id();

    // Walk-in cart is reused while active
    let again = app.post("/api/carts", &token, json!({})).await;
    assert_eq!(again.id(), cart_id);

    app.post(
        &format!("/api/carts/{cart_id}/items"),
        &token,
        json!({ "product_id": soap, "quantity": 2 }),
    )
    .await
    .ok();
    let merged = app
        .post(
            &format!("/api/carts/{cart_id}/items"),
            &token,
            json!({ "product_id": soap, "quantity": 3 }),
        )
        .await;
    let data = merged.ok();
    assert_eq!(data["items"].as_array().unwrap().len(), 1);
    assert_eq!(data["items"][0]["quantity"], 5);
    assert_money(&data["total_amount"], 12.5);

    let too_many = app
        .post(
            &format!("/api/carts/{cart_id}/items"),
            &token,
            json!({ "product_id": soap, "quantity": 6 }),
        )
        .await;
    assert_eq!(too_many.code(), "6003");

    let item_id = data["items"][0]["item_id"].as_str().unwrap().to_string();
    let updated = app
        .put(
            &format!("/api/carts/{cart_id}/items/{item_id}"),
            &token,
            json!({ "quantity": 1 }),
        )
        .await;
    assert_money(&updated.ok()["total_amount"], 2.5);

    let removed = app
        .put(
            &format!("/api/carts/{cart_id}/items/{item_id}"),
            &token,
            json!({ "quantity": 0 }),
        )
        .await;
    assert!(removed.ok()["items"].as_array().unwrap().is_empty());

    let missing = app
        .delete(&format!("/api/carts/{cart_id}/items/{item_id}"), &token)
        .await;
    assert_eq!(missing.code(), "4102");

    let empty = app
        .post(&format!("/api/carts/{cart_id}/checkout"), &token, json!({}))
        .await;
    assert_eq!(empty.code(), "4104");
}

#[tokio::test]
async fn test_cash_payment_completes_order_and_records_sale() {
    let app = TestApp::new().await;
    let token = app.register("cash@shop.test").await;
    let rice = app.product(&token, "Rice", 10.0, 8).await;
    let customer = app.customer(&token, "Ama", "0241111111").await;

    let cart_id = app
        .post("/api/carts", &token, json!({ "customer_id": customer }))
        .await
        .id();
    app.post(
        &format!("/api/carts/{cart_id}/items"),
        &token,
        json!({ "product_id": rice, "quantity": 4 }),
    )
    .await
    .ok();

    let order = app
        .post(&format!("/api/carts/{cart_id}/checkout"), &token, json!({ "notes": "deliver" }))
        .await;
    let order_data = order.ok().clone();
    let order_id = order.id();
    assert!(order_data["order_number"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(order_data["status"], "pending");
    assert_money(&order_data["total_amount"], 40.0);

    // Cart is closed after checkout
    let closed = app
        .post(
            &format!("/api/carts/{cart_id}/items"),
            &token,
            json!({ "product_id": rice, "quantity": 1 }),
        )
        .await;
    assert_eq!(closed.code(), "4103");

    let over = app
        .post(
            "/api/payments",
            &token,
            json!({ "order_id": order_id, "amount": 50.0, "method": "cash" }),
        )
        .await;
    assert_eq!(over.code(), "5002");

    let partial = app
        .post(
            "/api/payments",
            &token,
            json!({ "order_id": order_id, "amount": 15.0, "method": "cash" }),
        )
        .await;
    assert_eq!(partial.ok()["status"], "succeeded");

    let detail = app.get(&format!("/api/orders/{order_id}"), &token).await;
    assert_eq!(detail.ok()["payment_status"], "partial");
    assert_eq!(detail.ok()["status"], "pending");

    // Defaults to the remaining balance
    let rest = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "cash" }))
        .await;
    assert_money(&rest.ok()["amount"], 25.0);

    let detail = app.get(&format!("/api/orders/{order_id}"), &token).await;
    let data = detail.ok();
    assert_eq!(data["status"], "paid");
    assert_eq!(data["payment_status"], "paid");
    assert_eq!(data["payments"].as_array().unwrap().len(), 2);
    let sale_id = data["sale"].as_str().expect("sale recorded").to_string();

    let sale = app.get(&format!("/api/sales/{sale_id}"), &token).await;
    assert_eq!(sale.ok()["payment_type"], "full");

    let product = app.get(&format!("/api/products/{rice}"), &token).await;
    assert_eq!(product.ok()["stock"], 4);

    let customer = app.get(&format!("/api/customers/{customer}"), &token).await;
    assert_money(&customer.ok()["total_spent"], 40.0);

    let again = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "cash" }))
        .await;
    assert_eq!(again.code(), "4002");

    let fulfilled = app
        .put(&format!("/api/orders/{order_id}/status"), &token, json!({ "status": "fulfilled" }))
        .await;
    assert_eq!(fulfilled.ok()["status"], "fulfilled");
}

#[tokio::test]
async fn test_gateway_callback_is_verified_and_idempotent() {
    let app = TestApp::new().await;
    let token = app.register("gw@shop.test").await;
    let tea = app.product(&token, "Tea", 6.0, 7).await;

    let order = app
        .post(
            "/api/orders",
            &token,
            json!({ "items": [{ "product_id": tea, "quantity": 3 }] }),
        )
        .await;
    let order_id = order.id();

    let payment = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "mobile_money" }))
        .await;
    let data = payment.ok().clone();
    assert_eq!(data["status"], "pending");
    assert!(data["checkout_url"].as_str().unwrap().contains("/checkout/PAY-"));
    let reference = data["reference"].as_str().unwrap().to_string();

    let forged = app
        .call(
            Method::POST,
            "/api/payments/callback",
            None,
            Some(json!({
                "reference": reference,
                "status": "succeeded",
                "amount": 18.0,
                "signature": "deadbeef",
            })),
        )
        .await;
    assert_eq!(forged.code(), "5006");

    let signature = gateway().sign(&reference, PaymentState::Succeeded, 18.0);
    let callback = json!({
        "reference": reference,
        "status": "succeeded",
        "amount": 18.0,
        "signature": signature,
    });
    let accepted = app
        .call(Method::POST, "/api/payments/callback", None, Some(callback.clone()))
        .await;
    assert_eq!(accepted.ok()["status"], "succeeded");

    // Replay changes nothing
    let replay = app
        .call(Method::POST, "/api/payments/callback", None, Some(callback))
        .await;
    assert_eq!(replay.ok()["status"], "succeeded");

    let product = app.get(&format!("/api/products/{tea}"), &token).await;
    assert_eq!(product.ok()["stock"], 4);

    let sales = app.get("/api/sales", &token).await;
    assert_eq!(sales.ok().as_array().unwrap().len(), 1);

    let unknown_sig = gateway().sign("PAY-UNKNOWN", PaymentState::Succeeded, 1.0);
    let unknown = app
        .call(
            Method::POST,
            "/api/payments/callback",
            None,
            Some(json!({
                "reference": "PAY-UNKNOWN",
                "status": "succeeded",
                "amount": 1.0,
                "signature": unknown_sig,
            })),
        )
        .await;
    assert_eq!(unknown.code(), "5001");
}

#[tokio::test]
async fn test_callback_amount_must_match_payment() {
    let app = TestApp::new().await;
    let token = app.register("amount@shop.test").await;
    let soap = app.product(&token, "Soap", 2.5, 10).await;

    let order_id = app
        .post("/api/orders", &token, json!({ "items": [{ "product_id": soap, "quantity": 4 }] }))
        .await
        .id();
    let payment = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "card" }))
        .await;
    let payment_id = payment.id();
    let reference = payment.ok()["reference"].as_str().unwrap().to_string();

    // Correctly signed, but for less than the payment
    let mismatch = app
        .call(
            Method::POST,
            "/api/payments/callback",
            None,
            Some(json!({
                "reference": reference,
                "status": "succeeded",
                "amount": 1.0,
                "signature": gateway().sign(&reference, PaymentState::Succeeded, 1.0),
            })),
        )
        .await;
    assert_eq!(mismatch.code(), "5005");

    let stored = app.get(&format!("/api/payments/{payment_id}"), &token).await;
    assert_eq!(stored.ok()["status"], "pending");
    let order = app.get(&format!("/api/orders/{order_id}"), &token).await;
    assert_eq!(order.ok()["payment_status"], "unpaid");
    assert_money(&order.ok()["amount_paid"], 0.0);
}

#[tokio::test]
async fn test_pending_payments_reserve_the_order_balance() {
    let app = TestApp::new().await;
    let token = app.register("split@shop.test").await;
    let lamp = app.product(&token, "Lamp", 50.0, 4).await;

    let order_id = app
        .post("/api/orders", &token, json!({ "items": [{ "product_id": lamp, "quantity": 2 }] }))
        .await
        .id();

    let first = app
        .post(
            "/api/payments",
            &token,
            json!({ "order_id": order_id, "amount": 60.0, "method": "card" }),
        )
        .await;
    assert_eq!(first.ok()["status"], "pending");
    let first_id = first.id();

    // Only 40 is left once the first payment is in flight
    let second = app
        .post(
            "/api/payments",
            &token,
            json!({ "order_id": order_id, "amount": 60.0, "method": "card" }),
        )
        .await;
    assert_eq!(second.code(), "5002");
    assert_money(&second.body["details"]["pending"], 60.0);

    let rest = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "card" }))
        .await;
    assert_money(&rest.ok()["amount"], 40.0);
    let rest_id = rest.id();

    let nothing_left = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "cash" }))
        .await;
    assert_eq!(nothing_left.code(), "5002");

    for payment_id in [&first_id, &rest_id] {
        let settled = app
            .post(
                &format!("/api/payments/{payment_id}/simulate"),
                &token,
                json!({ "status": "succeeded" }),
            )
            .await;
        assert_eq!(settled.ok()["status"], "succeeded");
    }

    let order = app.get(&format!("/api/orders/{order_id}"), &token).await;
    assert_eq!(order.ok()["status"], "paid");
    assert_money(&order.ok()["amount_paid"], 100.0);

    let sales = app.get("/api/sales", &token).await;
    assert_eq!(sales.ok().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_captured_payment_on_cancelled_order_needs_refund() {
    let app = TestApp::new().await;
    let token = app.register("refund@shop.test").await;
    let kettle = app.product(&token, "Kettle", 30.0, 2).await;

    let order_id = app
        .post("/api/orders", &token, json!({ "items": [{ "product_id": kettle, "quantity": 1 }] }))
        .await
        .id();
    let payment_id = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "card" }))
        .await
        .id();
    app.post(&format!("/api/orders/{order_id}/cancel"), &token, json!({}))
        .await
        .ok();

    let captured = app
        .post(
            &format!("/api/payments/{payment_id}/simulate"),
            &token,
            json!({ "status": "succeeded" }),
        )
        .await;
    let data = captured.ok().clone();
    assert_eq!(data["status"], "succeeded");
    assert!(data["failure_reason"].as_str().unwrap().starts_with("Refund required"));

    let order = app.get(&format!("/api/orders/{order_id}"), &token).await;
    assert_eq!(order.ok()["status"], "cancelled");
    assert_money(&order.ok()["amount_paid"], 0.0);

    let product = app.get(&format!("/api/products/{kettle}"), &token).await;
    assert_eq!(product.ok()["stock"], 2);
    assert!(app.get("/api/sales", &token).await.ok().as_array().unwrap().is_empty());

    let notifications = app.get("/api/notifications", &token).await;
    assert!(
        notifications
            .ok()
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["title"] == "Refund required" && n["kind"] == "payment")
    );
}

#[tokio::test]
async fn test_simulated_failure_keeps_order_pending() {
    let app = TestApp::new().await;
    let token = app.register("sim@shop.test").await;
    let pen = app.product(&token, "Pen", 1.2, 50).await;

    let order_id = app
        .post("/api/orders", &token, json!({ "items": [{ "product_id": pen, "quantity": 5 }] }))
        .await
        .id();
    let payment_id = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "card" }))
        .await
        .id();

    let failed = app
        .post(
            &format!("/api/payments/{payment_id}/simulate"),
            &token,
            json!({ "status": "failed" }),
        )
        .await;
    assert_eq!(failed.ok()["status"], "failed");
    assert!(failed.ok()["failure_reason"].as_str().is_some());

    let final_again = app
        .post(
            &format!("/api/payments/{payment_id}/simulate"),
            &token,
            json!({ "status": "succeeded" }),
        )
        .await;
    assert_eq!(final_again.code(), "5004");

    let order = app.get(&format!("/api/orders/{order_id}"), &token).await;
    assert_eq!(order.ok()["status"], "pending");
    assert_eq!(order.ok()["payment_status"], "unpaid");

    let cancelled = app
        .post(&format!("/api/orders/{order_id}/cancel"), &token, json!({}))
        .await;
    assert_eq!(cancelled.ok()["status"], "cancelled");
    let twice = app
        .post(&format!("/api/orders/{order_id}/cancel"), &token, json!({}))
        .await;
    assert_eq!(twice.code(), "4003");
}

#[tokio::test]
async fn test_gateway_outage_leaves_no_payment() {
    let app = TestApp::new().await.with_gateway(Arc::new(OfflineGateway));
    let token = app.register("offline@shop.test").await;
    let jam = app.product(&token, "Jam", 4.0, 3).await;

    let order_id = app
        .post("/api/orders", &token, json!({ "items": [{ "product_id": jam, "quantity": 1 }] }))
        .await
        .id();
    let reply = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "card" }))
        .await;
    assert_eq!(reply.code(), "5007");
    assert_eq!(reply.status, http::StatusCode::SERVICE_UNAVAILABLE);

    let payments = app.get("/api/payments", &token).await;
    assert!(payments.ok().as_array().unwrap().is_empty());

    // Cash does not need the gateway
    let cash = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "cash" }))
        .await;
    assert_eq!(cash.ok()["status"], "succeeded");
}

#[tokio::test]
async fn test_unconfigured_gateway_rejects_card_payments() {
    let app = TestApp::with_config(|c| c.gateway_base_url = String::new()).await;
    let token = app.register("nogw@shop.test").await;
    let oil = app.product(&token, "Oil", 12.0, 2).await;

    let order_id = app
        .post("/api/orders", &token, json!({ "items": [{ "product_id": oil, "quantity": 1 }] }))
        .await
        .id();
    let card = app
        .post("/api/payments", &token, json!({ "order_id": order_id, "method": "card" }))
        .await;
    assert_eq!(card.code(), "5007");
    assert!(app.get("/api/payments", &token).await.ok().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_simulate_disabled_in_production() {
    let app = TestApp::with_config(|c| c.environment = "production".into()).await;
    let token = app.register("prod@shop.test").await;

    let reply = app
        .post("/api/payments/payment:any/simulate", &token, json!({ "status": "succeeded" }))
        .await;
    assert_eq!(reply.code(), "2001");
}

#[tokio::test]
async fn test_invalid_order_transition() {
    let app = TestApp::new().await;
    let token = app.register("flow@shop.test").await;
    let cup = app.product(&token, "Cup", 3.0, 5).await;

    let order_id = app
        .post("/api/orders", &token, json!({ "items": [{ "product_id": cup, "quantity": 1 }] }))
        .await
        .id();
    let reply = app
        .put(&format!("/api/orders/{order_id}/status"), &token, json!({ "status": "fulfilled" }))
        .await;
    assert_eq!(reply.code(), "4004");

    let empty = app.post("/api/orders", &token, json!({ "items": [] })).await;
    assert_eq!(empty.code(), "4005");
}
