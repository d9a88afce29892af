//! Product API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/stock", post(handler::adjust_stock))
        .route("/{id}/image", post(handler::upload_image))
        .route("/{id}/variants", post(handler::add_variant))
        .route(
            "/{id}/variants/{variant_id}",
            put(handler::update_variant).delete(handler::remove_variant),
        )
}
