//! Sale API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales", sale_routes())
}

fn sale_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // 静态路径优先于 /{id}
        .route("/summary", get(handler::summary))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/payments", post(handler::pay))
}
