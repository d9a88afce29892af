//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{GatewayCallback, PaymentCreate, PaymentQuery, SimulatePaymentRequest};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Payment;
use crate::db::repository::{PaymentRepository, record_ref};
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

/// POST /api/payments - 发起订单支付
pub async fn initiate(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<PaymentCreate>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    payload.validate()?;
    let payment = state.checkout().initiate_payment(user.owner(), payload).await?;
    Ok(ok(payment))
}

/// POST /api/payments/callback - 支付网关回调 (公共, 签名校验)
pub async fn callback(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<GatewayCallback>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    tracing::info!(reference = %payload.reference, status = ?payload.status, "Gateway callback received");
    let payment = state.checkout().handle_callback(payload).await?;
    Ok(ok(payment))
}

/// GET /api/payments?order_id=&status=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<PaymentQuery>,
) -> AppResult<Json<ApiResponse<Vec<Payment>>>> {
    let order = query.order_id.as_deref().map(|o| record_ref("order", o));
    let payments = PaymentRepository::new(state.get_db())
        .find_all(user.owner(), order.as_deref(), query.status)
        .await?;
    Ok(ok(payments))
}

/// GET /api/payments/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let payment = PaymentRepository::new(state.get_db())
        .find_by_id(user.owner(), &id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::PaymentNotFound, format!("Payment {} not found", id)))?;
    Ok(ok(payment))
}

/// POST /api/payments/:id/simulate - 模拟网关回调 (开发用, 生产环境禁用)
pub async fn simulate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SimulatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    if state.config.is_production() {
        security_log!("WARN", "simulate_in_production", user_id = user.id.clone(), payment = id.clone());
        return Err(AppError::permission_denied(
            "Payment simulation is disabled in production",
        ));
    }
    let payment = state.checkout().simulate(user.owner(), &id, payload).await?;
    Ok(ok(payment))
}
