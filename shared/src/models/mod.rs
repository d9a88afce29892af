//! Data models
//!
//! Request payloads, enums and embedded sub-documents shared between the
//! server and its clients (via API). Top-level documents with database ids
//! live in `shop-server::db::models`.
//! All ids on the wire are `"table:key"` strings; timestamps are i64 millis.

pub mod cart;
pub mod customer;
pub mod event;
pub mod limits;
pub mod log;
pub mod membership;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod sale;
pub mod user;

// Re-exports
pub use cart::*;
pub use customer::*;
pub use event::*;
pub use limits::*;
pub use log::*;
pub use membership::*;
pub use notification::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use sale::*;
pub use user::*;
