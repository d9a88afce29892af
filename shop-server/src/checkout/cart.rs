//! Cart line operations
//!
//! Every mutation ends with [`recompute_totals`], so
//! `total_amount == Σ price × quantity` holds for every stored cart.

use rust_decimal::Decimal;
use shared::models::{CartItem, MAX_QUANTITY};

use crate::db::models::{Cart, Document, Product};
use crate::ledger::money::{line_subtotal, to_f64};
use crate::utils::ids::short_id;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Refresh each line's subtotal and the cart total
pub fn recompute_totals(cart: &mut Cart) -> AppResult<()> {
    cart.total_amount = refresh_subtotals(&mut cart.items)?;
    Ok(())
}

/// Refresh line subtotals, return the total
pub fn refresh_subtotals(items: &mut [CartItem]) -> AppResult<f64> {
    let mut total = Decimal::ZERO;
    for item in items.iter_mut() {
        let subtotal = line_subtotal(item.price, item.quantity).ok_or_else(amount_too_large)?;
        item.subtotal = to_f64(subtotal);
        total = total.checked_add(subtotal).ok_or_else(amount_too_large)?;
    }
    Ok(to_f64(total))
}

/// A checked-out cart is read-only
pub fn ensure_mutable(cart: &Cart) -> AppResult<()> {
    if cart.is_active() {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::CartCheckedOut).with_detail("cart_id", cart.id_string()))
    }
}

/// Product must be sellable and hold `quantity` units of the variant
pub fn ensure_available(product: &Product, variant_id: Option<&str>, quantity: i64) -> AppResult<()> {
    if !product.is_active {
        return Err(AppError::with_message(
            ErrorCode::ProductNotFound,
            format!("Product {} is not available", product.name),
        ));
    }
    let stock = product
        .stock_of(variant_id)
        .ok_or_else(|| variant_not_found(variant_id))?;
    if quantity > stock {
        return Err(AppError::with_message(
            ErrorCode::ProductOutOfStock,
            format!("Only {} of {} in stock", stock.max(0), product.name),
        )
        .with_detail("product_id", product.id_string())
        .with_detail("available", stock.max(0))
        .with_detail("requested", quantity));
    }
    Ok(())
}

/// Priced line snapshot (name and unit price taken from the product now)
pub fn price_line(product: &Product, variant_id: Option<&str>, quantity: i64) -> AppResult<CartItem> {
    validate_line_quantity(quantity)?;
    let (name, price) = product
        .line_snapshot(variant_id)
        .ok_or_else(|| variant_not_found(variant_id))?;
    Ok(CartItem {
        item_id: short_id(),
        product: product.id_string(),
        variant_id: variant_id.map(str::to_string),
        name,
        price,
        quantity,
        subtotal: to_f64(line_subtotal(price, quantity).ok_or_else(amount_too_large)?),
    })
}

/// Add `quantity` of a product/variant, merging into an existing line
pub fn add_line(cart: &mut Cart, product: &Product, variant_id: Option<&str>, quantity: i64) -> AppResult<()> {
    validate_line_quantity(quantity)?;
    let product_ref = product.id_string();

    let existing = cart
        .items
        .iter()
        .position(|i| i.product == product_ref && i.variant_id.as_deref() == variant_id);
    let in_cart = existing.map(|idx| cart.items[idx].quantity).unwrap_or(0);
    let merged = merged_quantity(in_cart, quantity)?;
    ensure_available(product, variant_id, merged)?;

    match existing {
        Some(idx) => {
            let line = &mut cart.items[idx];
            line.quantity = merged;
            // Latest product price wins
            if let Some((name, price)) = product.line_snapshot(variant_id) {
                line.name = name;
                line.price = price;
            }
        }
        None => cart.items.push(price_line(product, variant_id, quantity)?),
    }
    recompute_totals(cart)
}

/// Set a line's quantity; 0 removes the line
///
/// `product` is required for a positive quantity (stock check).
pub fn set_quantity(cart: &mut Cart, item_id: &str, quantity: i64, product: Option<&Product>) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("Quantity must not be negative, got {}", quantity),
        ));
    }
    let idx = find_line(cart, item_id)?;
    if quantity == 0 {
        cart.items.remove(idx);
    } else {
        validate_line_quantity(quantity)?;
        if let Some(product) = product {
            ensure_available(product, cart.items[idx].variant_id.as_deref(), quantity)?;
        }
        cart.items[idx].quantity = quantity;
    }
    recompute_totals(cart)
}

pub fn remove_line(cart: &mut Cart, item_id: &str) -> AppResult<CartItem> {
    let idx = find_line(cart, item_id)?;
    let removed = cart.items.remove(idx);
    recompute_totals(cart)?;
    Ok(removed)
}

pub fn clear(cart: &mut Cart) {
    cart.items.clear();
    cart.total_amount = 0.0;
}

pub fn find_line(cart: &Cart, item_id: &str) -> AppResult<usize> {
    cart.items
        .iter()
        .position(|i| i.item_id == item_id)
        .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound).with_detail("item_id", item_id))
}

fn validate_line_quantity(quantity: i64) -> AppResult<()> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("Quantity must be between 1 and {}, got {}", MAX_QUANTITY, quantity),
        )
        .with_detail("max", MAX_QUANTITY));
    }
    Ok(())
}

/// Quantity of a line after merging in `extra` more units
pub fn merged_quantity(current: i64, extra: i64) -> AppResult<i64> {
    let merged = current
        .checked_add(extra)
        .ok_or_else(|| AppError::with_message(ErrorCode::InvalidQuantity, "Quantity is too large"))?;
    validate_line_quantity(merged)?;
    Ok(merged)
}

fn amount_too_large() -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, "Line amount is too large")
}

fn variant_not_found(variant_id: Option<&str>) -> AppError {
    AppError::new(ErrorCode::VariantNotFound).with_detail("variant_id", variant_id.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CartStatus, Variant};
    use surrealdb::RecordId;

    fn product(key: &str, price: f64, stock: i64) -> Product {
        Product {
            id: Some(RecordId::from_table_key("product", key)),
            owner: "user:o".into(),
            name: key.to_uppercase(),
            description: None,
            category: None,
            sku: None,
            price,
            cost_price: None,
            stock,
            image: None,
            variants: vec![Variant {
                id: "v1".into(),
                name: "Large".into(),
                sku: None,
                price: price + 1.0,
                stock: 2,
            }],
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn cart() -> Cart {
        Cart {
            id: Some(RecordId::from_table_key("cart", "c1")),
            owner: "user:o".into(),
            customer: None,
            items: vec![],
            total_amount: 0.0,
            status: CartStatus::Active,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn assert_total_invariant(cart: &Cart) {
        let expected: f64 = cart.items.iter().map(|i| i.price * i.quantity as f64).sum();
        assert!((cart.total_amount - expected).abs() < 0.005, "{} vs {}", cart.total_amount, expected);
    }

    #[test]
    fn test_add_merges_same_product_and_variant() {
        let mut c = cart();
        let tea = product("tea", 2.5, 10);
        add_line(&mut c, &tea, None, 2).unwrap();
        add_line(&mut c, &tea, None, 3).unwrap();
        add_line(&mut c, &tea, Some("v1"), 1).unwrap();

        assert_eq!(c.items.len(), 2);
        assert_eq!(c.items[0].quantity, 5);
        assert_eq!(c.items[1].name, "TEA (Large)");
        assert_eq!(c.total_amount, 16.0);
        assert_total_invariant(&c);
    }

    #[test]
    fn test_add_checks_combined_stock() {
        let mut c = cart();
        let tea = product("tea", 1.0, 3);
        add_line(&mut c, &tea, None, 2).unwrap();
        let err = add_line(&mut c, &tea, None, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductOutOfStock);
        assert_eq!(c.items[0].quantity, 2);

        let err = add_line(&mut c, &tea, Some("v1"), 3).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductOutOfStock);
        let err = add_line(&mut c, &tea, Some("nope"), 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::VariantNotFound);
    }

    #[test]
    fn test_inactive_product_rejected() {
        let mut c = cart();
        let mut tea = product("tea", 1.0, 3);
        tea.is_active = false;
        assert_eq!(add_line(&mut c, &tea, None, 1).unwrap_err().code, ErrorCode::ProductNotFound);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut c = cart();
        let tea = product("tea", 0.1, 100);
        let cake = product("cake", 3.3, 100);
        add_line(&mut c, &tea, None, 3).unwrap();
        add_line(&mut c, &cake, None, 1).unwrap();
        assert_eq!(c.total_amount, 3.6);

        let tea_line = c.items[0].item_id.clone();
        set_quantity(&mut c, &tea_line, 7, Some(&tea)).unwrap();
        assert_eq!(c.total_amount, 4.0);
        assert_total_invariant(&c);

        set_quantity(&mut c, &tea_line, 0, None).unwrap();
        assert_eq!(c.items.len(), 1);
        assert_eq!(c.total_amount, 3.3);

        let cake_line = c.items[0].item_id.clone();
        remove_line(&mut c, &cake_line).unwrap();
        assert!(c.items.is_empty());
        assert_eq!(c.total_amount, 0.0);

        assert_eq!(remove_line(&mut c, "missing").unwrap_err().code, ErrorCode::CartItemNotFound);
        assert_eq!(
            set_quantity(&mut c, "missing", -1, None).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
    }

    #[test]
    fn test_line_quantity_limit() {
        let mut c = cart();
        let rice = product("rice", 1.0, i64::MAX);
        add_line(&mut c, &rice, None, MAX_QUANTITY).unwrap();
        let err = add_line(&mut c, &rice, None, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert_eq!(c.items[0].quantity, MAX_QUANTITY);

        assert_eq!(merged_quantity(i64::MAX, 1).unwrap_err().code, ErrorCode::InvalidQuantity);
        assert_eq!(merged_quantity(2, 3).unwrap(), 5);

        let line = c.items[0].item_id.clone();
        assert_eq!(
            set_quantity(&mut c, &line, MAX_QUANTITY + 1, Some(&rice)).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
    }

    #[test]
    fn test_checked_out_cart_is_read_only() {
        let mut c = cart();
        c.status = CartStatus::CheckedOut;
        assert_eq!(ensure_mutable(&c).unwrap_err().code, ErrorCode::CartCheckedOut);
    }
}
