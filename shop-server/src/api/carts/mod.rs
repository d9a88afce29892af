//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/carts", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::open))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/items", post(handler::add_item).delete(handler::clear))
        .route(
            "/{id}/items/{item_id}",
            put(handler::update_item).delete(handler::remove_item),
        )
        .route("/{id}/checkout", post(handler::checkout))
}
