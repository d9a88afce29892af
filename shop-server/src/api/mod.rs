//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`users`] - 注册、登录、个人资料、会员、日志
//! - [`upload`] - 文件上传接口
//! - [`customers`] - 客户与赊账还款
//! - [`products`] - 商品、规格、库存
//! - [`carts`] - 购物车
//! - [`orders`] - 订单
//! - [`payments`] - 支付与网关回调
//! - [`sales`] - 销售记录与汇总
//! - [`notifications`] - 站内通知
//! - [`events`] - 店铺日历

pub mod health;
pub mod upload;
pub mod users;

// Data models API
pub mod carts;
pub mod customers;
pub mod events;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod products;
pub mod sales;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// Map a repository duplicate to a resource-specific code
pub(crate) fn duplicate_as(code: ErrorCode) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::Duplicate(msg) => AppError::with_message(code, msg),
        other => other.into(),
    }
}
