//! Payment API 模块
//!
//! `/callback` 为公共路由 (网关签名校验), 其余需要登录

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", payment_routes())
}

fn payment_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::initiate))
        .route("/callback", post(handler::callback))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/simulate", post(handler::simulate))
}
