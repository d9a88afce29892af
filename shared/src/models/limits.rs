//! 数值上限
//!
//! 请求 DTO 的 `#[validate(range(...))]` 使用相同的字面量。

/// Maximum unit price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum quantity on one line
pub const MAX_QUANTITY: i64 = 9_999;
/// Maximum stock level, also the largest single adjustment
pub const MAX_STOCK: i64 = 1_000_000;
/// Maximum payment or sale amount
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;
