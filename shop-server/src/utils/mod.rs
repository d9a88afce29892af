//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - [`AppJson`] / [`AppQuery`] - 错误映射到统一响应的提取器
//! - 日志、校验、时间等工具

pub mod error;
pub mod ids;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCategory, ErrorCode};
pub use error::{multipart_error, ok, ok_with_message};
