//! Upload Routes
//!
//! 图片上传 (需要登录) 与下载 (公开, 客户端直接嵌入)

mod handler;

pub(crate) use handler::store_multipart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/uploads", post(handler::upload))
        .route("/api/uploads/{filename}", get(handler::serve))
}
