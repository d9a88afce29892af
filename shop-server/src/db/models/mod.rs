//! Database Models
//!
//! Top-level documents as stored in SurrealDB. Every document carries an
//! `owner` ("user:key") except users themselves; foreign references are
//! "table:key" strings. Embedded sub-documents and enums come from
//! `shared::models`.

// Serde helpers
pub mod serde_helpers;

pub mod cart;
pub mod customer;
pub mod event;
pub mod log_entry;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod sale;
pub mod user;

// Re-exports
pub use cart::Cart;
pub use customer::{Customer, CustomerDetail};
pub use event::Event;
pub use log_entry::LogEntry;
pub use notification::Notification;
pub use order::{Order, OrderDetail};
pub use payment::Payment;
pub use product::Product;
pub use sale::Sale;
pub use user::User;

use serde::Serialize;
use serde::de::DeserializeOwned;
use surrealdb::RecordId;

/// A document stored in its own table
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> Option<&RecordId>;

    /// Remove the id before writing the document back (`UPDATE $id CONTENT ...`)
    fn take_id(&mut self) -> Option<RecordId>;

    /// "table:key" or empty when not yet persisted
    fn id_string(&self) -> String {
        self.id().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// A document scoped to one shop
pub trait Owned: Document {
    fn owner(&self) -> &str;
}

/// Implements [`Document`] for a struct with an `id: Option<RecordId>` field,
/// and [`Owned`] when the struct has an `owner: String` field
macro_rules! impl_document {
    ($ty:ty, $table:literal, owned) => {
        $crate::db::models::impl_document!($ty, $table);

        impl $crate::db::models::Owned for $ty {
            fn owner(&self) -> &str {
                &self.owner
            }
        }
    };
    ($ty:ty, $table:literal) => {
        impl $crate::db::models::Document for $ty {
            const TABLE: &'static str = $table;

            fn id(&self) -> Option<&surrealdb::RecordId> {
                self.id.as_ref()
            }

            fn take_id(&mut self) -> Option<surrealdb::RecordId> {
                self.id.take()
            }
        }
    };
}
pub(crate) use impl_document;
