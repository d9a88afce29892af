//! Sale API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{SaleCreate, SalePaymentRequest, SaleQuery, SalesSummary};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::checkout::summarize;
use crate::core::ServerState;
use crate::db::models::Sale;
use crate::db::repository::sale::SaleFilter;
use crate::db::repository::{SaleRepository, record_ref};
use crate::utils::time::date_range;
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

/// POST /api/sales - 直接销售 (POS)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<SaleCreate>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    payload.validate()?;
    let sale = state.checkout().create_sale(user.owner(), payload).await?;
    Ok(ok(sale))
}

/// GET /api/sales?customer_id=&payment_type=&from=&to=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<SaleQuery>,
) -> AppResult<Json<ApiResponse<Vec<Sale>>>> {
    let sales = query_sales(&state, &user, &query).await?;
    Ok(ok(sales))
}

/// GET /api/sales/summary?from=&to=
pub async fn summary(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<SaleQuery>,
) -> AppResult<Json<ApiResponse<SalesSummary>>> {
    let sales = query_sales(&state, &user, &query).await?;
    Ok(ok(summarize(&sales)))
}

/// GET /api/sales/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let sale = SaleRepository::new(state.get_db())
        .find_by_id(user.owner(), &id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::SaleNotFound, format!("Sale {} not found", id)))?;
    Ok(ok(sale))
}

/// POST /api/sales/:id/payments - 单笔赊账还款
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SalePaymentRequest>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    payload.validate()?;
    let sale = state.ledger().pay_sale(user.owner(), &id, payload).await?;
    Ok(ok(sale))
}

async fn query_sales(state: &ServerState, user: &CurrentUser, query: &SaleQuery) -> AppResult<Vec<Sale>> {
    let (from, to) = date_range(query.from.as_deref(), query.to.as_deref())?;
    let customer = query.customer_id.as_deref().map(|c| record_ref("customer", c));
    let filter = SaleFilter {
        customer: customer.as_deref(),
        payment_type: query.payment_type,
        from,
        to,
    };
    Ok(SaleRepository::new(state.get_db()).find_all(user.owner(), filter).await?)
}
