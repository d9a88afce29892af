//! 赊账销售与还款对账测试

mod common;

use common::{TestApp, assert_money, money};
use serde_json::{Value, json};
use shared::models::{CreditDetails, CreditStatus, PaymentMethod, PaymentType};
use shop_server::db::models::{Document, Sale};
use shop_server::db::repository::SaleRepository;
use std::time::Duration;

async fn credit_sale(app: &TestApp, token: &str, customer: &str, product: &str, qty: i64, paid: f64) -> Value {
    // Distinct created_at for oldest-first ordering
    tokio::time::sleep(Duration::from_millis(5)).await;
    app.post(
        "/api/sales",
        token,
        json!({
            "customer_id": customer,
            "items": [{ "product_id": product, "quantity": qty }],
            "amount_paid": paid,
            "payment_method": "cash",
        }),
    )
    .await
    .ok()
    .clone()
}

#[tokio::test]
async fn test_customer_payment_settles_oldest_first() {
    let app = TestApp::new().await;
    let token = app.register("credit@shop.test").await;
    let flour = app.product(&token, "Flour", 10.0, 100).await;
    let kofi = app.customer(&token, "Kofi", "0200000001").await;

    // Owes 30, then 20, then 15
    let first = credit_sale(&app, &token, &kofi, &flour, 4, 10.0).await;
    let second = credit_sale(&app, &token, &kofi, &flour, 2, 0.0).await;
    let third = credit_sale(&app, &token, &kofi, &flour, 2, 5.0).await;
    assert_eq!(first["payment_type"], "credit");
    assert_money(&first["credit_details"]["amount_owed"], 30.0);

    let detail = app.get(&format!("/api/customers/{kofi}"), &token).await;
    assert_money(&detail.ok()["outstanding_balance"], 65.0);
    assert_eq!(detail.ok()["credits"].as_array().unwrap().len(), 3);

    let too_much = app
        .post(
            &format!("/api/customers/{kofi}/payments"),
            &token,
            json!({ "amount": 65.01, "method": "cash" }),
        )
        .await;
    assert_eq!(too_much.code(), "5103");

    let result = app
        .post(
            &format!("/api/customers/{kofi}/payments"),
            &token,
            json!({ "amount": 40.0, "method": "mobile_money" }),
        )
        .await;
    let data = result.ok();
    assert_money(&data["total_applied"], 40.0);
    assert_money(&data["remaining_balance"], 25.0);
    let applied = data["applied"].as_array().unwrap();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0]["sale_id"], first["id"]);
    assert_eq!(applied[0]["status"], "settled");
    assert_eq!(applied[1]["sale_id"], second["id"]);
    assert_eq!(applied[1]["status"], "partial");
    assert_money(&applied[1]["remaining_owed"], 10.0);
    assert!(data["payment_id"].as_str().is_some());

    let credits = app.get(&format!("/api/customers/{kofi}/credits"), &token).await;
    let open: Vec<&str> = credits
        .ok()
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(open, vec![second["id"].as_str().unwrap(), third["id"].as_str().unwrap()]);

    // Deleting is refused while money is owed
    let refused = app.delete(&format!("/api/customers/{kofi}"), &token).await;
    assert_eq!(refused.code(), "3003");

    let rest = app
        .post(
            &format!("/api/customers/{kofi}/payments"),
            &token,
            json!({ "amount": 25.0, "method": "cash" }),
        )
        .await;
    assert_money(&rest.ok()["remaining_balance"], 0.0);

    let nothing = app
        .post(
            &format!("/api/customers/{kofi}/payments"),
            &token,
            json!({ "amount": 1.0, "method": "cash" }),
        )
        .await;
    assert_eq!(nothing.code(), "5104");

    let deleted = app.delete(&format!("/api/customers/{kofi}"), &token).await;
    assert_eq!(deleted.ok(), &json!(true));
}

#[tokio::test]
async fn test_credits_created_together_keep_a_stable_order() {
    let app = TestApp::new().await;
    let sales = SaleRepository::new(app.state.get_db());
    let created_at = 1_740_823_200_000;

    for owed in [5.0, 7.0, 9.0, 11.0] {
        sales
            .create(Sale {
                id: None,
                owner: "user:shop".to_string(),
                customer: Some("customer:ama".to_string()),
                order: None,
                items: Vec::new(),
                total_amount: owed,
                amount_paid: 0.0,
                payment_method: PaymentMethod::Cash,
                payment_type: PaymentType::Credit,
                credit_details: Some(CreditDetails {
                    amount_owed: owed,
                    due_date: None,
                    status: CreditStatus::Outstanding,
                    repayments: Vec::new(),
                }),
                created_at,
                updated_at: created_at,
            })
            .await
            .expect("create");
    }

    let ids = |rows: Vec<Sale>| rows.iter().map(|s| s.id_string()).collect::<Vec<_>>();
    let first = ids(sales
        .find_outstanding_credits("user:shop", "customer:ama")
        .await
        .expect("query"));
    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first.len(), 4);
    assert_eq!(first, sorted);

    let again = ids(sales
        .find_outstanding_credits("user:shop", "customer:ama")
        .await
        .expect("query"));
    assert_eq!(first, again);
}

#[tokio::test]
async fn test_single_sale_repayment() {
    let app = TestApp::new().await;
    let token = app.register("single@shop.test").await;
    let oil = app.product(&token, "Oil", 12.5, 20).await;
    let efua = app.customer(&token, "Efua", "0200000002").await;

    let sale = credit_sale(&app, &token, &efua, &oil, 2, 5.0).await;
    let sale_id = sale["id"].as_str().unwrap();

    let over = app
        .post(&format!("/api/sales/{sale_id}/payments"), &token, json!({ "amount": 20.01 }))
        .await;
    assert_eq!(over.code(), "5103");

    let paid = app
        .post(&format!("/api/sales/{sale_id}/payments"), &token, json!({ "amount": 20.0, "method": "card" }))
        .await;
    let data = paid.ok();
    assert_eq!(data["credit_details"]["status"], "settled");
    assert_money(&data["credit_details"]["amount_owed"], 0.0);
    assert_eq!(data["credit_details"]["repayments"].as_array().unwrap().len(), 1);

    let settled = app
        .post(&format!("/api/sales/{sale_id}/payments"), &token, json!({ "amount": 1.0 }))
        .await;
    assert_eq!(settled.code(), "5102");

    let summary = app.get("/api/sales/summary", &token).await;
    let data = summary.ok();
    assert_eq!(data["count"], 1);
    assert_eq!(data["credit_count"], 1);
    assert_money(&data["revenue"], 25.0);
    assert_money(&data["collected"], 25.0);
    assert_money(&data["outstanding_credit"], 0.0);
    assert_money(&data["by_method"]["cash"], 5.0);
    assert_money(&data["by_method"]["card"], 20.0);

    let customer = app.get(&format!("/api/customers/{efua}"), &token).await;
    assert!(money(&customer.ok()["outstanding_balance"]).abs() < 0.005);
}

#[tokio::test]
async fn test_sale_validation() {
    let app = TestApp::new().await;
    let token = app.register("rules@shop.test").await;
    let salt = app.product(&token, "Salt", 1.0, 8).await;

    let walk_in_credit = app
        .post(
            "/api/sales",
            &token,
            json!({ "items": [{ "product_id": salt, "quantity": 1 }], "amount_paid": 0.5 }),
        )
        .await;
    assert_eq!(walk_in_credit.code(), "5101");

    let overpaid = app
        .post(
            "/api/sales",
            &token,
            json!({ "items": [{ "product_id": salt, "quantity": 1 }], "amount_paid": 2.0 }),
        )
        .await;
    assert_eq!(overpaid.code(), "5105");

    let no_stock = app
        .post(
            "/api/sales",
            &token,
            json!({ "items": [{ "product_id": salt, "quantity": 9 }], "amount_paid": 9.0 }),
        )
        .await;
    assert_eq!(no_stock.code(), "6003");

    let full = app
        .post(
            "/api/sales",
            &token,
            json!({ "items": [{ "product_id": salt, "quantity": 4 }], "amount_paid": 4.0 }),
        )
        .await;
    assert_eq!(full.ok()["payment_type"], "full");

    // 8 -> 4 crosses the threshold of 5
    let notifications = app.get("/api/notifications?unread=true", &token).await;
    assert!(
        notifications
            .ok()
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["kind"] == "low_stock")
    );
}

#[tokio::test]
async fn test_shops_are_isolated() {
    let app = TestApp::new().await;
    let alice = app.register("alice@shop.test").await;
    let bob = app.register("bob@shop.test").await;
    let customer = app.customer(&alice, "Yaw", "0200000003").await;

    let foreign = app.get(&format!("/api/customers/{customer}"), &bob).await;
    assert_eq!(foreign.code(), "3001");

    let listed = app.get("/api/customers", &bob).await;
    assert!(listed.ok().as_array().unwrap().is_empty());

    // Phone uniqueness is per shop
    app.customer(&bob, "Yaw", "0200000003").await;
    let dup = app
        .post("/api/customers", &alice, json!({ "name": "Other", "phone": "0200000003" }))
        .await;
    assert_eq!(dup.code(), "3002");
}
