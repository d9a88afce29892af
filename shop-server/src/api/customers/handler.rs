//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{CreditPaymentRequest, CustomerCreate, CustomerQuery, CustomerUpdate, ReconciliationResult};
use shared::util::now_millis;
use validator::Validate;

use crate::api::duplicate_as;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Customer, CustomerDetail, Document, Sale};
use crate::db::repository::CustomerRepository;
use crate::ledger::money::{MONEY_TOLERANCE, to_decimal};
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

const RESOURCE: &str = "customer";

/// GET /api/customers?q= - 获取所有客户
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<CustomerQuery>,
) -> AppResult<Json<ApiResponse<Vec<Customer>>>> {
    let repo = CustomerRepository::new(state.get_db());
    let customers = repo.find_all(user.owner(), query.q.as_deref()).await?;
    Ok(ok(customers))
}

/// GET /api/customers/:id - 客户详情 (含未结清赊账)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CustomerDetail>>> {
    let customer = find(&state, &user, &id).await?;
    let credits = state.ledger().outstanding(user.owner(), &id).await?;
    Ok(ok(CustomerDetail { customer, credits }))
}

/// POST /api/customers - 创建客户
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<CustomerCreate>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    payload.validate()?;

    let now = now_millis();
    let customer = Customer {
        id: None,
        owner: user.owner().to_string(),
        name: payload.name.trim().to_string(),
        phone: normalize(payload.phone),
        email: normalize(payload.email),
        address: normalize(payload.address),
        notes: normalize(payload.notes),
        total_spent: 0.0,
        outstanding_balance: 0.0,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let customer = CustomerRepository::new(state.get_db())
        .create(customer)
        .await
        .map_err(duplicate_as(ErrorCode::CustomerPhoneExists))?;

    state
        .logs()
        .info(
            user.owner(),
            "customer_created",
            format!("Customer {} created", customer.name),
            Some(customer.id_string()),
        )
        .await;
    Ok(ok(customer))
}

/// PUT /api/customers/:id - 更新客户
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CustomerUpdate>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    payload.validate()?;
    let repo = CustomerRepository::new(state.get_db());
    let mut customer = find(&state, &user, &id).await?;

    if let Some(name) = payload.name {
        customer.name = name.trim().to_string();
    }
    if let Some(phone) = payload.phone {
        let phone = normalize(Some(phone));
        if let Some(p) = phone.as_deref()
            && let Some(other) = repo.find_by_phone(user.owner(), p).await?
            && other.id != customer.id
        {
            return Err(AppError::with_message(
                ErrorCode::CustomerPhoneExists,
                format!("Customer with phone '{}' already exists", p),
            ));
        }
        customer.phone = phone;
    }
    if let Some(email) = payload.email {
        customer.email = normalize(Some(email));
    }
    if let Some(address) = payload.address {
        customer.address = normalize(Some(address));
    }
    if let Some(notes) = payload.notes {
        customer.notes = normalize(Some(notes));
    }
    customer.updated_at = now_millis();

    Ok(ok(repo.save(customer).await?))
}

/// DELETE /api/customers/:id - 删除客户 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let mut customer = find(&state, &user, &id).await?;
    if to_decimal(customer.outstanding_balance) >= MONEY_TOLERANCE {
        return Err(AppError::with_message(
            ErrorCode::CustomerHasBalance,
            format!(
                "Customer still owes {:.2}",
                customer.outstanding_balance
            ),
        )
        .with_detail("outstanding_balance", customer.outstanding_balance));
    }

    customer.is_active = false;
    customer.updated_at = now_millis();
    let customer = CustomerRepository::new(state.get_db()).save(customer).await?;

    state
        .logs()
        .info(
            user.owner(),
            "customer_deleted",
            format!("Customer {} deleted", customer.name),
            Some(customer.id_string()),
        )
        .await;
    Ok(ok(true))
}

/// GET /api/customers/:id/credits - 未结清赊账 (最早的在前)
pub async fn credits(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Sale>>>> {
    let sales = state.ledger().outstanding(user.owner(), &id).await?;
    Ok(ok(sales))
}

/// POST /api/customers/:id/payments - 赊账还款
pub async fn pay_credit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CreditPaymentRequest>,
) -> AppResult<Json<ApiResponse<ReconciliationResult>>> {
    payload.validate()?;
    let result = state.ledger().pay_customer(user.owner(), &id, payload).await?;
    Ok(ok(result))
}

async fn find(state: &ServerState, user: &CurrentUser, id: &str) -> AppResult<Customer> {
    CustomerRepository::new(state.get_db())
        .find_by_id(user.owner(), id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::CustomerNotFound, format!("{RESOURCE} {id} not found")))
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
