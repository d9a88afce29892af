//! User API 模块
//!
//! 注册 / 登录为公共路由，其余需要 Bearer 令牌。

mod handler;
mod membership;

use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, post, put},
};

use crate::auth::require_owner;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", user_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me).put(handler::update_profile))
        .route("/me/password", put(handler::change_password))
        .route("/me/logs", get(handler::logs))
        .route(
            "/me/membership",
            get(membership::get).post(membership::subscribe.layer(middleware::from_fn(require_owner))),
        )
}
