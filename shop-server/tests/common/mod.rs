//! 集成测试公共工具
//!
//! 每个测试一个独立的内存数据库和临时工作目录, 请求经完整中间件栈
//! (`build_router`) 以 `oneshot` 发送。

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shop_server::{Config, PaymentGateway, ServerState, build_router};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    _dir: TempDir,
}

/// Parsed envelope
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn code(&self) -> &str {
        self.body["resultCode"].as_str().unwrap_or_default()
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// Assert success and return `data`
    pub fn ok(&self) -> &Value {
        assert_eq!(self.code(), "0", "unexpected error: {}", self.body);
        self.data()
    }

    pub fn id(&self) -> String {
        self.ok()["id"].as_str().expect("id").to_string()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config::for_tests(dir.path().to_string_lossy().to_string());
        adjust(&mut config);
        let state = ServerState::for_tests(config).await.expect("state");
        Self {
            router: build_router(state.clone()),
            state,
            _dir: dir,
        }
    }

    /// Same app with the payment gateway replaced
    pub fn with_gateway(self, gateway: Arc<dyn PaymentGateway>) -> Self {
        let state = self.state.with_gateway(gateway);
        Self {
            router: build_router(state.clone()),
            state,
            _dir: self._dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Reply { status, body }
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Reply {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.call(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Reply {
        self.call(Method::DELETE, uri, Some(token), None).await
    }

    /// Register a shop owner and return its token
    pub async fn register(&self, email: &str) -> String {
        let reply = self
            .call(
                Method::POST,
                "/api/users/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "password123",
                    "name": "Owner",
                    "shop_name": "Corner Shop",
                })),
            )
            .await;
        reply.ok()["token"].as_str().expect("token").to_string()
    }

    pub async fn product(&self, token: &str, name: &str, price: f64, stock: i64) -> String {
        self.post(
            "/api/products",
            token,
            json!({ "name": name, "price": price, "stock": stock }),
        )
        .await
        .id()
    }

    pub async fn customer(&self, token: &str, name: &str, phone: &str) -> String {
        self.post("/api/customers", token, json!({ "name": name, "phone": phone }))
            .await
            .id()
    }
}

pub fn money(value: &Value) -> f64 {
    value.as_f64().expect("number")
}

pub fn assert_money(value: &Value, expected: f64) {
    let actual = money(value);
    assert!((actual - expected).abs() < 0.005, "expected {expected}, got {actual}");
}
