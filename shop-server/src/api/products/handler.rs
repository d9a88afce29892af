//! Product API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use shared::models::{
    MAX_STOCK, ProductCreate, ProductQuery, ProductUpdate, StockAdjustRequest, Variant, VariantInput,
    VariantUpdate,
};
use shared::util::now_millis;
use validator::Validate;

use crate::api::duplicate_as;
use crate::api::upload::store_multipart;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Document, Product};
use crate::db::repository::product::ProductFilter;
use crate::db::repository::{ProductRepository, UserRepository};
use crate::utils::ids::short_id;
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

// =============================================================================
// Product Handlers
// =============================================================================

/// GET /api/products?q=&category=&low_stock= - 获取商品
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<ProductQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let filter = ProductFilter {
        q: query.q.as_deref(),
        category: query.category.as_deref(),
        low_stock_threshold: query.low_stock.then_some(state.config.low_stock_threshold),
    };
    let products = ProductRepository::new(state.get_db())
        .find_all(user.owner(), filter)
        .await?;
    Ok(ok(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(ok(find(&state, &user, &id).await?))
}

/// POST /api/products - 创建商品 (受会员计划限制)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    payload.validate()?;
    let repo = ProductRepository::new(state.get_db());
    let now = now_millis();

    // 会员计划商品数量上限
    let account = UserRepository::new(state.get_db())
        .find_by_id(&user.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    let plan = account.membership.effective_plan(now);
    if let Some(limit) = plan.product_limit() {
        let count = repo.count_active(user.owner()).await?;
        if count >= limit {
            return Err(AppError::with_message(
                ErrorCode::PlanLimitReached,
                format!("The {} plan allows at most {} products", plan.as_str(), limit),
            )
            .with_detail("limit", limit)
            .with_detail("plan", plan.as_str()));
        }
    }

    let variants = build_variants(payload.variants)?;
    let product = Product {
        id: None,
        owner: user.owner().to_string(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        category: trimmed(payload.category),
        sku: trimmed(payload.sku),
        price: payload.price,
        cost_price: payload.cost_price,
        stock: payload.stock,
        image: payload.image,
        variants,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let product = repo
        .create(product)
        .await
        .map_err(duplicate_as(ErrorCode::ProductSkuExists))?;

    tracing::info!(owner = %user.owner(), product = %product.id_string(), "Product created");
    state
        .logs()
        .info(
            user.owner(),
            "product_created",
            format!("Product {} created", product.name),
            Some(product.id_string()),
        )
        .await;
    Ok(ok(product))
}

/// PUT /api/products/:id - 更新商品 (variants 整体替换)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    payload.validate()?;
    let repo = ProductRepository::new(state.get_db());
    let mut product = find(&state, &user, &id).await?;

    if let Some(sku) = payload.sku {
        let sku = trimmed(Some(sku));
        if let Some(s) = sku.as_deref()
            && let Some(other) = repo.find_by_sku(user.owner(), s).await?
            && other.id != product.id
        {
            return Err(AppError::with_message(
                ErrorCode::ProductSkuExists,
                format!("SKU '{}' already exists", s),
            ));
        }
        product.sku = sku;
    }
    if let Some(name) = payload.name {
        product.name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        product.description = Some(description);
    }
    if let Some(category) = payload.category {
        product.category = trimmed(Some(category));
    }
    if let Some(price) = payload.price {
        product.price = price;
    }
    if let Some(cost_price) = payload.cost_price {
        product.cost_price = Some(cost_price);
    }
    if let Some(stock) = payload.stock {
        product.stock = stock;
    }
    if let Some(image) = payload.image {
        product.image = Some(image);
    }
    if let Some(is_active) = payload.is_active {
        product.is_active = is_active;
    }
    if let Some(variants) = payload.variants {
        product.variants = build_variants(variants)?;
    }
    product.updated_at = now_millis();

    Ok(ok(repo.save(product).await?))
}

/// DELETE /api/products/:id - 删除商品 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let mut product = find(&state, &user, &id).await?;
    product.is_active = false;
    product.updated_at = now_millis();
    let product = ProductRepository::new(state.get_db()).save(product).await?;

    state
        .logs()
        .info(
            user.owner(),
            "product_deleted",
            format!("Product {} deleted", product.name),
            Some(product.id_string()),
        )
        .await;
    Ok(ok(true))
}

/// POST /api/products/:id/stock - 调整库存
pub async fn adjust_stock(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    payload.validate()?;
    let mut product = find(&state, &user, &id).await?;
    let variant_id = payload.variant_id.as_deref();

    let before = product
        .stock_of(variant_id)
        .ok_or_else(|| variant_not_found(variant_id.unwrap_or_default()))?;
    let after = before.checked_add(payload.delta).unwrap_or(i64::MAX);
    if after > MAX_STOCK {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Stock cannot exceed {}", MAX_STOCK),
        )
        .with_detail("current", before)
        .with_detail("delta", payload.delta));
    }
    if after < 0 {
        return Err(AppError::with_message(
            ErrorCode::ProductOutOfStock,
            format!("Stock cannot go below zero (current {})", before),
        )
        .with_detail("available", before)
        .with_detail("delta", payload.delta));
    }

    let product_name = product.name.clone();
    let label = match variant_id.and_then(|vid| product.variant_mut(vid)) {
        Some(variant) => {
            variant.stock = after;
            format!("{} ({})", product_name, variant.name)
        }
        None => {
            product.stock = after;
            product.name.clone()
        }
    };
    product.updated_at = now_millis();
    let product = ProductRepository::new(state.get_db()).save(product).await?;

    tracing::info!(product = %product.id_string(), before, after, "Stock adjusted");
    state
        .notifications()
        .notify_low_stock(
            user.owner(),
            &product.id_string(),
            &label,
            before,
            after,
            state.config.low_stock_threshold,
        )
        .await;
    Ok(ok(product))
}

/// POST /api/products/:id/image - 上传商品图片
pub async fn upload_image(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let mut product = find(&state, &user, &id).await?;
    let stored = store_multipart(&state, multipart).await?;

    product.image = Some(stored.filename);
    product.updated_at = now_millis();
    Ok(ok(ProductRepository::new(state.get_db()).save(product).await?))
}

// =============================================================================
// Variant Handlers
// =============================================================================

/// POST /api/products/:id/variants - 添加规格
pub async fn add_variant(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<VariantInput>,
) -> AppResult<Json<ApiResponse<Product>>> {
    payload.validate()?;
    let mut product = find(&state, &user, &id).await?;
    let name = payload.name.trim();
    if product.has_variant_named(name, None) {
        return Err(variant_name_exists(name));
    }

    product.variants.push(new_variant(payload));
    product.updated_at = now_millis();
    Ok(ok(ProductRepository::new(state.get_db()).save(product).await?))
}

/// PUT /api/products/:id/variants/:variant_id - 更新规格
pub async fn update_variant(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, variant_id)): Path<(String, String)>,
    AppJson(payload): AppJson<VariantUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    payload.validate()?;
    let mut product = find(&state, &user, &id).await?;

    if let Some(name) = payload.name.as_deref().map(str::trim)
        && product.has_variant_named(name, Some(&variant_id))
    {
        return Err(variant_name_exists(name));
    }

    let variant = product
        .variant_mut(&variant_id)
        .ok_or_else(|| variant_not_found(&variant_id))?;
    if let Some(name) = payload.name {
        variant.name = name.trim().to_string();
    }
    if let Some(sku) = payload.sku {
        variant.sku = trimmed(Some(sku));
    }
    if let Some(price) = payload.price {
        variant.price = price;
    }
    if let Some(stock) = payload.stock {
        variant.stock = stock;
    }
    product.updated_at = now_millis();

    Ok(ok(ProductRepository::new(state.get_db()).save(product).await?))
}

/// DELETE /api/products/:id/variants/:variant_id - 删除规格
pub async fn remove_variant(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, variant_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let mut product = find(&state, &user, &id).await?;
    let before = product.variants.len();
    product.variants.retain(|v| v.id != variant_id);
    if product.variants.len() == before {
        return Err(variant_not_found(&variant_id));
    }

    product.updated_at = now_millis();
    Ok(ok(ProductRepository::new(state.get_db()).save(product).await?))
}

// =============================================================================
// Helpers
// =============================================================================

async fn find(state: &ServerState, user: &CurrentUser, id: &str) -> AppResult<Product> {
    ProductRepository::new(state.get_db())
        .find_by_id(user.owner(), id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", id))
        })
}

/// Variant names must be unique inside a product
fn build_variants(inputs: Vec<VariantInput>) -> AppResult<Vec<Variant>> {
    let mut variants: Vec<Variant> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name.trim();
        if variants.iter().any(|v| v.name.eq_ignore_ascii_case(name)) {
            return Err(variant_name_exists(name));
        }
        variants.push(new_variant(input));
    }
    Ok(variants)
}

fn new_variant(input: VariantInput) -> Variant {
    Variant {
        id: short_id(),
        name: input.name.trim().to_string(),
        sku: trimmed(input.sku),
        price: input.price,
        stock: input.stock,
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn variant_not_found(variant_id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::VariantNotFound,
        format!("Variant {} not found", variant_id),
    )
}

fn variant_name_exists(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::VariantNameExists,
        format!("Variant '{}' already exists", name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> VariantInput {
        VariantInput {
            name: name.into(),
            sku: Some("  ".into()),
            price: 4.5,
            stock: 2,
        }
    }

    #[test]
    fn test_build_variants_assigns_ids() {
        let variants = build_variants(vec![input(" Small "), input("Large")]).unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].name, "Small");
        assert_eq!(variants[0].sku, None);
        assert_ne!(variants[0].id, variants[1].id);
    }

    #[test]
    fn test_build_variants_rejects_duplicate_names() {
        let err = build_variants(vec![input("Small"), input("small")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::VariantNameExists);
    }
}
