//! Cart API Handlers
//!
//! Line arithmetic lives in [`crate::checkout::cart`]; handlers load, mutate
//! and save. Concurrent edits of one cart are last-write-wins.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    AddCartItemRequest, CartCreate, CartQuery, CheckoutRequest, UpdateCartItemRequest,
};
use shared::util::now_millis;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::checkout::cart;
use crate::core::ServerState;
use crate::db::models::{Cart, Document, Order, Product};
use crate::db::repository::{CartRepository, CustomerRepository, ProductRepository};
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

/// POST /api/carts - 获取客户的活动购物车, 没有则创建
pub async fn open(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<CartCreate>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let repo = CartRepository::new(state.get_db());

    let customer = match payload.customer_id.as_deref().filter(|c| !c.is_empty()) {
        Some(id) => {
            let customer = CustomerRepository::new(state.get_db())
                .find_by_id(user.owner(), id)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(ErrorCode::CustomerNotFound, format!("Customer {} not found", id))
                })?;
            Some(customer.id_string())
        }
        None => None,
    };

    if let Some(existing) = repo.find_active(user.owner(), customer.as_deref()).await? {
        return Ok(ok(existing));
    }

    let now = now_millis();
    let cart = repo
        .create(Cart {
            id: None,
            owner: user.owner().to_string(),
            customer,
            items: Vec::new(),
            total_amount: 0.0,
            status: Default::default(),
            created_at: now,
            updated_at: now,
        })
        .await?;
    tracing::debug!(cart = %cart.id_string(), "Cart created");
    Ok(ok(cart))
}

/// GET /api/carts?status=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<CartQuery>,
) -> AppResult<Json<ApiResponse<Vec<Cart>>>> {
    let carts = CartRepository::new(state.get_db())
        .find_all(user.owner(), query.status)
        .await?;
    Ok(ok(carts))
}

/// GET /api/carts/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    Ok(ok(find(&state, &user, &id).await?))
}

/// POST /api/carts/:id/items - 添加商品 (同商品同规格合并数量)
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<AddCartItemRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    payload.validate()?;
    let mut cart = find(&state, &user, &id).await?;
    cart::ensure_mutable(&cart)?;

    let product = product(&state, &user, &payload.product_id).await?;
    cart::add_line(&mut cart, &product, payload.variant_id.as_deref(), payload.quantity)?;
    save(&state, cart).await
}

/// PUT /api/carts/:id/items/:item_id - 修改数量 (0 = 删除)
pub async fn update_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item_id)): Path<(String, String)>,
    AppJson(payload): AppJson<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let mut cart = find(&state, &user, &id).await?;
    cart::ensure_mutable(&cart)?;

    let idx = cart::find_line(&cart, &item_id)?;
    let product = if payload.quantity > 0 {
        Some(product(&state, &user, &cart.items[idx].product).await?)
    } else {
        None
    };
    cart::set_quantity(&mut cart, &item_id, payload.quantity, product.as_ref())?;
    save(&state, cart).await
}

/// DELETE /api/carts/:id/items/:item_id
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let mut cart = find(&state, &user, &id).await?;
    cart::ensure_mutable(&cart)?;
    cart::remove_line(&mut cart, &item_id)?;
    save(&state, cart).await
}

/// DELETE /api/carts/:id/items - 清空购物车
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let mut cart = find(&state, &user, &id).await?;
    cart::ensure_mutable(&cart)?;
    cart::clear(&mut cart);
    save(&state, cart).await
}

/// DELETE /api/carts/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let cart = find(&state, &user, &id).await?;
    let deleted = CartRepository::new(state.get_db())
        .delete(&cart.id_string())
        .await?;
    Ok(ok(deleted))
}

/// POST /api/carts/:id/checkout - 购物车转订单
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    payload.validate()?;
    let order = state.checkout().checkout_cart(user.owner(), &id, payload).await?;
    Ok(ok(order))
}

async fn find(state: &ServerState, user: &CurrentUser, id: &str) -> AppResult<Cart> {
    CartRepository::new(state.get_db())
        .find_by_id(user.owner(), id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::CartNotFound, format!("Cart {} not found", id)))
}

async fn product(state: &ServerState, user: &CurrentUser, id: &str) -> AppResult<Product> {
    ProductRepository::new(state.get_db())
        .find_by_id(user.owner(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id))
}

async fn save(state: &ServerState, mut cart: Cart) -> AppResult<Json<ApiResponse<Cart>>> {
    cart.updated_at = now_millis();
    Ok(ok(CartRepository::new(state.get_db()).save(cart).await?))
}
