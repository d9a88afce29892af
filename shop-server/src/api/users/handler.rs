//! User Handlers
//!
//! Registration, login and the caller's own profile

use std::time::Duration;

use axum::{Json, extract::State};
use shared::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, LogQuery, MembershipInfo, RegisterRequest,
    UpdateProfileRequest, UserProfile, UserRole,
};
use shared::util::now_millis;
use validator::Validate;

use crate::api::duplicate_as;
use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::models::{LogEntry, User};
use crate::db::repository::{LogRepository, UserRepository};
use crate::security_log;
use crate::utils::validation::{clamp_limit, validate_password};
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Default number of log entries returned
const DEFAULT_LOG_LIMIT: u32 = 50;

/// POST /api/users/register - 注册店主账号
pub async fn register(
    State(state): State<ServerState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;
    validate_password(&req.password)?;

    let now = now_millis();
    let user = User {
        id: None,
        email: req.email.trim().to_lowercase(),
        hash_pass: hash_password(&req.password)?,
        name: req.name.trim().to_string(),
        shop_name: req.shop_name.trim().to_string(),
        phone: req.phone,
        role: UserRole::Owner,
        is_active: true,
        membership: MembershipInfo::free(now),
        created_at: now,
        updated_at: now,
    };

    let user = UserRepository::new(state.get_db())
        .create(user)
        .await
        .map_err(duplicate_as(ErrorCode::EmailAlreadyRegistered))?;

    tracing::info!(user_id = %user.to_profile().id, email = %user.email, "User registered");
    state
        .logs()
        .info(&user.to_profile().id, "register", format!("Shop {} registered", user.shop_name), None)
        .await;

    Ok(ok(issue_token(&state, &user)?))
}

/// POST /api/users/login - 登录
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let email = req.email.trim().to_lowercase();
    let user = UserRepository::new(state.get_db()).find_by_email(&email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) if verify_password(&req.password, &u.hash_pass) => u,
        Some(_) => {
            security_log!("WARN", "login_failed", email = email.clone(), reason = "invalid_password");
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", email = email.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.is_active {
        security_log!("WARN", "login_disabled", email = email.clone());
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    tracing::info!(email = %user.email, "User logged in successfully");
    Ok(ok(issue_token(&state, &user)?))
}

/// GET /api/users/me
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let user = load_user(&state, &user).await?;
    Ok(ok(user.to_profile()))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    req.validate()?;
    let mut user = load_user(&state, &current).await?;

    if let Some(name) = req.name {
        user.name = name.trim().to_string();
    }
    if let Some(shop_name) = req.shop_name {
        user.shop_name = shop_name.trim().to_string();
    }
    if let Some(phone) = req.phone {
        user.phone = Some(phone).filter(|p| !p.trim().is_empty());
    }
    user.updated_at = now_millis();

    let user = UserRepository::new(state.get_db()).save(user).await?;
    Ok(ok(user.to_profile()))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut user = load_user(&state, &current).await?;
    if !verify_password(&req.current_password, &user.hash_pass) {
        security_log!("WARN", "password_change_failed", user_id = current.id.clone());
        return Err(AppError::new(ErrorCode::PasswordMismatch));
    }
    validate_password(&req.new_password)?;

    user.hash_pass = hash_password(&req.new_password)?;
    user.updated_at = now_millis();
    UserRepository::new(state.get_db()).save(user).await?;

    security_log!("INFO", "password_changed", user_id = current.id.clone());
    state.logs().info(current.owner(), "password_changed", "Password changed", None).await;
    Ok(Json(ApiResponse::ok()))
}

/// GET /api/users/me/logs?limit=
pub async fn logs(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppQuery(query): AppQuery<LogQuery>,
) -> AppResult<Json<ApiResponse<Vec<LogEntry>>>> {
    let limit = clamp_limit(query.limit, DEFAULT_LOG_LIMIT);
    let entries = LogRepository::new(state.get_db())
        .find_recent(current.owner(), limit)
        .await?;
    Ok(ok(entries))
}

pub(super) async fn load_user(state: &ServerState, current: &CurrentUser) -> AppResult<User> {
    UserRepository::new(state.get_db())
        .find_by_id(&current.id)
        .await?
        .ok_or_else(AppError::unauthorized)
}

fn issue_token(state: &ServerState, user: &User) -> AppResult<AuthResponse> {
    let profile = user.to_profile();
    let (token, expires_at) = state
        .get_jwt_service()
        .generate_token(&profile.id, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    Ok(AuthResponse {
        token,
        expires_at,
        user: profile,
    })
}
