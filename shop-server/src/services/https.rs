//! HTTP 服务组装
//!
//! 路由合并与中间件栈: 请求日志, request id, 追踪, CORS, 压缩,
//! panic 捕获, body 上限, 超时, JWT 认证, 系统错误上报。

use std::any::Any;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::response::{IntoResponse, Response};
use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{CurrentUser, require_auth};
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// HTTP 请求日志中间件
async fn log_request(request: Request, next: middleware::Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = start.elapsed();
    tracing::info!(target: "http_access", "{} {} {} {:?}", method, uri, status, elapsed);

    response
}

/// 请求超时 → 9004
async fn request_timeout(State(state): State<ServerState>, request: Request, next: middleware::Next) -> Response {
    let limit = Duration::from_millis(state.config.request_timeout_ms);
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => AppError::new(ErrorCode::TimeoutError).into_response(),
    }
}

/// 系统错误上报到 log 集合
///
/// 位于认证中间件之内，可以读取 [`CurrentUser`]。
async fn report_errors(State(state): State<ServerState>, request: Request, next: middleware::Next) -> Response {
    let owner = request
        .extensions()
        .get::<CurrentUser>()
        .map(|u| u.owner().to_string());
    let action = format!("{} {}", request.method(), request.uri().path());

    let response = next.run(request).await;

    if let Some(err) = response.extensions().get::<AppError>()
        && err.is_system()
    {
        state.logs().system_error(owner.as_deref(), &action, err).await;
    }
    response
}

/// Panic → 9001 envelope
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    AppError::new(ErrorCode::InternalError).into_response()
}

/// 未匹配路由 → 3 NotFound
async fn fallback(request: Request) -> AppError {
    AppError::with_message(ErrorCode::NotFound, format!("Route not found: {}", request.uri().path()))
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::users::router())
        .merge(crate::api::upload::router())
        .merge(crate::api::customers::router())
        .merge(crate::api::products::router())
        .merge(crate::api::carts::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::payments::router())
        .merge(crate::api::sales::router())
        .merge(crate::api::notifications::router())
        .merge(crate::api::events::router())
        .fallback(fallback)
}

/// Router with state and the full middleware stack
pub fn build_router(state: ServerState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    build_app()
        .layer(middleware::from_fn_with_state(state.clone(), report_errors))
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(middleware::from_fn_with_state(state.clone(), request_timeout))
        .with_state(state)
        // Tower HTTP 中间件 (从外到内)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_request))
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}
