//! Membership Handlers (店铺订阅)

use axum::{Json, extract::State};
use shared::models::{MembershipInfo, MembershipResponse, NotificationKind, Plan, SubscribeRequest};
use shared::util::{add_months_millis, now_millis};

use super::handler::load_user;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{ProductRepository, UserRepository};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult, ErrorCode, ok};

const MAX_MONTHS: u32 = 24;

/// GET /api/users/me/membership
pub async fn get(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<ApiResponse<MembershipResponse>>> {
    let user = load_user(&state, &current).await?;
    let product_count = ProductRepository::new(state.get_db())
        .count_active(current.owner())
        .await?;
    Ok(ok(describe(&user.membership, product_count, now_millis())))
}

/// POST /api/users/me/membership - 订阅 / 续费 (仅店主)
pub async fn subscribe(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(req): AppJson<SubscribeRequest>,
) -> AppResult<Json<ApiResponse<MembershipResponse>>> {
    if req.months == 0 || req.months > MAX_MONTHS {
        return Err(AppError::with_message(
            ErrorCode::InvalidMembershipDuration,
            format!("months must be between 1 and {MAX_MONTHS}"),
        ));
    }

    let now = now_millis();
    let mut user = load_user(&state, &current).await?;
    user.membership = extend(&user.membership, req.plan, req.months, now);
    user.updated_at = now;
    let user = UserRepository::new(state.get_db()).save(user).await?;

    let summary = match user.membership.expires_at {
        Some(exp) => format!(
            "Plan {} active until {}",
            req.plan.as_str(),
            chrono::DateTime::from_timestamp_millis(exp)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        ),
        None => format!("Plan {} active", req.plan.as_str()),
    };
    tracing::info!(owner = %current.owner(), plan = req.plan.as_str(), months = req.months, "Membership updated");
    state
        .notifications()
        .notify(current.owner(), NotificationKind::Membership, "Membership updated", summary.clone(), None)
        .await;
    state.logs().info(current.owner(), "membership", summary, None).await;

    let product_count = ProductRepository::new(state.get_db())
        .count_active(current.owner())
        .await?;
    Ok(ok(describe(&user.membership, product_count, now)))
}

/// 计算订阅后的会员信息
///
/// - `free`: 无到期时间
/// - 同一付费计划且未过期: 从当前到期时间顺延
/// - 其它: 从现在开始
fn extend(current: &MembershipInfo, plan: Plan, months: u32, now: i64) -> MembershipInfo {
    if plan == Plan::Free {
        return MembershipInfo::free(now);
    }

    let renewing = current.plan == plan && !current.is_expired(now);
    let (started_at, base) = match current.expires_at {
        Some(exp) if renewing => (current.started_at, exp.max(now)),
        _ => (now, now),
    };

    MembershipInfo {
        plan,
        started_at,
        expires_at: Some(add_months_millis(base, months)),
    }
}

fn describe(membership: &MembershipInfo, product_count: u64, now: i64) -> MembershipResponse {
    let effective_plan = membership.effective_plan(now);
    MembershipResponse {
        plan: membership.plan,
        effective_plan,
        started_at: membership.started_at,
        expires_at: membership.expires_at,
        is_expired: membership.is_expired(now),
        product_limit: effective_plan.product_limit(),
        product_count,
    }
}
