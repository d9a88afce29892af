//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{OrderCreate, OrderQuery, OrderStatusUpdate};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Document, Order, OrderDetail};
use crate::db::repository::{OrderRepository, PaymentRepository, record_ref};
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

/// GET /api/orders?status=&customer_id= - 订单列表 (最新的在前)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<OrderQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let customer = query.customer_id.as_deref().map(|c| record_ref("customer", c));
    let orders = OrderRepository::new(state.get_db())
        .find_all(user.owner(), query.status, customer.as_deref())
        .await?;
    Ok(ok(orders))
}

/// GET /api/orders/:id - 订单详情 (含支付记录)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let order = OrderRepository::new(state.get_db())
        .find_by_id(user.owner(), &id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id)))?;
    let payments = PaymentRepository::new(state.get_db())
        .find_by_order(user.owner(), &order.id_string())
        .await?;
    Ok(ok(OrderDetail { order, payments }))
}

/// POST /api/orders - 直接下单 (不经过购物车)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<OrderCreate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    payload.validate()?;
    let order = state.checkout().create_order(user.owner(), payload).await?;
    Ok(ok(order))
}

/// PUT /api/orders/:id/status
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .checkout()
        .update_order_status(user.owner(), &id, payload.status)
        .await?;
    Ok(ok(order))
}

/// POST /api/orders/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.checkout().cancel_order(user.owner(), &id).await?;
    Ok(ok(order))
}
