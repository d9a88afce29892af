//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// 公共 API 路由 (无需令牌)
fn is_public_api_route(method: &http::Method, path: &str) -> bool {
    match path {
        "/api/users/register" | "/api/users/login" | "/api/payments/callback" => true,
        // 上传文件下载 (图片直接嵌入客户端)
        _ => method == http::Method::GET && path.starts_with("/api/uploads/"),
    }
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (health, fallback)
/// - `/api/users/register`, `/api/users/login`
/// - `/api/payments/callback` (支付网关回调, 签名校验)
/// - `GET /api/uploads/{file}`
///
/// # 错误处理
///
/// | 错误 | resultCode |
/// |------|------------|
/// | 无 Authorization 头 | 1001 NotAuthenticated |
/// | 令牌过期 | 1003 TokenExpired |
/// | 无效令牌 | 1004 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state, req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Bearer 令牌 → [`CurrentUser`]
///
/// 中间件和 [`CurrentUser`] 提取器共用。
pub(crate) fn authenticate(
    state: &ServerState,
    headers: &http::HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let Some(header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!("WARN", "auth_missing", uri = uri.path().to_string());
        return Err(AppError::unauthorized());
    };
    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    state
        .get_jwt_service()
        .validate_token(token)
        .map(CurrentUser::from)
        .map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = uri.path().to_string()
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })
}

/// 店主中间件 - 要求 owner 角色
///
/// # 错误
///
/// 非店主返回 2002 OwnerRequired
pub async fn require_owner(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.current_user()?;
    if !user.is_owner() {
        security_log!(
            "WARN",
            "owner_required",
            user_id = user.id.clone(),
            email = user.email.clone()
        );
        return Err(AppError::new(ErrorCode::OwnerRequired));
    }

    Ok(next.run(req).await)
}

/// 从请求中提取 CurrentUser 的扩展方法
pub trait CurrentUserExt {
    /// 从请求扩展中获取 CurrentUser
    ///
    /// # 错误
    ///
    /// 未认证返回 1001 NotAuthenticated
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or_else(AppError::unauthorized)
    }
}
