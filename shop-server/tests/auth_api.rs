//! 认证、个人资料与会员接口测试

mod common;

use common::TestApp;
use http::{Method, StatusCode};
use serde_json::json;
use shop_server::db::repository::UserRepository;

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = TestApp::new().await;
    let token = app.register("Owner@Shop.test").await;

    let me = app.get("/api/users/me", &token).await;
    let profile = me.ok();
    assert_eq!(profile["email"], "owner@shop.test");
    assert_eq!(profile["membership"]["plan"], "free");
    assert!(profile.get("hash_pass").is_none());

    let login = app
        .call(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "owner@shop.test", "password": "password123" })),
        )
        .await;
    assert!(login.ok()["token"].as_str().is_some());

    let bad = app
        .call(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "owner@shop.test", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(bad.code(), "1002");
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);

    let unknown = app
        .call(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "nobody@shop.test", "password": "password123" })),
        )
        .await;
    assert_eq!(unknown.code(), "1002");
}

#[tokio::test]
async fn test_disabled_account_cannot_log_in() {
    let app = TestApp::new().await;
    app.register("idle@shop.test").await;

    let users = UserRepository::new(app.state.get_db());
    let mut user = users
        .find_by_email("idle@shop.test")
        .await
        .expect("query")
        .expect("user");
    user.is_active = false;
    users.save(user).await.expect("save");

    let login = app
        .call(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "idle@shop.test", "password": "password123" })),
        )
        .await;
    assert_eq!(login.code(), "1007");
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);

    // Wrong password still reports invalid credentials
    let wrong = app
        .call(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "idle@shop.test", "password": "not-the-password" })),
        )
        .await;
    assert_eq!(wrong.code(), "1002");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_short_passwords() {
    let app = TestApp::new().await;
    app.register("dup@shop.test").await;

    let body = |email: &str, password: &str| {
        json!({ "email": email, "password": password, "name": "A", "shop_name": "B" })
    };
    let dup = app
        .call(Method::POST, "/api/users/register", None, Some(body("DUP@shop.test", "password123")))
        .await;
    assert_eq!(dup.code(), "1008");

    let short = app
        .call(Method::POST, "/api/users/register", None, Some(body("new@shop.test", "short")))
        .await;
    assert_eq!(short.code(), "1009");
}

#[tokio::test]
async fn test_bearer_token_required() {
    let app = TestApp::new().await;

    let missing = app.call(Method::GET, "/api/users/me", None, None).await;
    assert_eq!(missing.code(), "1001");

    let invalid = app.get("/api/users/me", "not-a-jwt").await;
    assert_eq!(invalid.code(), "1004");

    // Health stays public
    let health = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(health.body["status"], "healthy");
}

#[tokio::test]
async fn test_profile_update_and_password_change() {
    let app = TestApp::new().await;
    let token = app.register("pw@shop.test").await;

    let updated = app
        .put("/api/users/me", &token, json!({ "shop_name": "Renamed", "phone": "555-0100" }))
        .await;
    assert_eq!(updated.ok()["shop_name"], "Renamed");

    let wrong = app
        .put(
            "/api/users/me/password",
            &token,
            json!({ "current_password": "nope-nope", "new_password": "newpassword1" }),
        )
        .await;
    assert_eq!(wrong.code(), "1010");

    let changed = app
        .put(
            "/api/users/me/password",
            &token,
            json!({ "current_password": "password123", "new_password": "newpassword1" }),
        )
        .await;
    assert_eq!(changed.code(), "0");

    let logs = app.get("/api/users/me/logs?limit=10", &token).await;
    let actions: Vec<&str> = logs
        .ok()
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["action"].as_str())
        .collect();
    assert!(actions.contains(&"password_changed"));
}

#[tokio::test]
async fn test_membership_subscription() {
    let app = TestApp::new().await;
    let token = app.register("plan@shop.test").await;

    let current = app.get("/api/users/me/membership", &token).await;
    assert_eq!(current.ok()["effective_plan"], "free");
    assert_eq!(current.ok()["product_limit"], 50);

    let invalid = app
        .post("/api/users/me/membership", &token, json!({ "plan": "basic", "months": 30 }))
        .await;
    assert_eq!(invalid.code(), "3103");

    let first = app
        .post("/api/users/me/membership", &token, json!({ "plan": "basic", "months": 1 }))
        .await;
    let first_expiry = first.ok()["expires_at"].as_i64().unwrap();
    assert_eq!(first.ok()["product_limit"], 500);

    // Renewing the same plan extends from the current expiry
    let renewed = app
        .post("/api/users/me/membership", &token, json!({ "plan": "basic", "months": 1 }))
        .await;
    assert!(renewed.ok()["expires_at"].as_i64().unwrap() > first_expiry);

    let notifications = app.get("/api/notifications", &token).await;
    assert!(
        notifications
            .ok()
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["kind"] == "membership")
    );
}
