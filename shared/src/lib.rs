//! Shared types for the shop backend
//!
//! Wire types used by the server and its clients: the error table,
//! the response envelope, request/response DTOs and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
