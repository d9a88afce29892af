//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables. Every query on a shop
//! document is scoped by `owner`; a document of another shop behaves as if
//! it did not exist.

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
pub use cart::CartRepository;
pub use customer::CustomerRepository;
pub use event::EventRepository;
pub use log_entry::LogRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use user::UserRepository;

use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::models::{Document, Owned};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析 API 传入的 id: record_id("product", "abc") 或 record_id("product", "product:abc")
//   - 文档内引用: id.to_string() => "product:abc"
//   - CRUD: db.select(id) / db.update(id) / db.delete(id) 直接使用 RecordId

/// Build a RecordId from a path/body id that may or may not carry the table prefix
pub fn record_id(table: &str, raw: &str) -> RecordId {
    let key = raw
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(raw);
    let key = key
        .trim_start_matches(['⟨', '`'])
        .trim_end_matches(['⟩', '`']);
    RecordId::from_table_key(table, key)
}

/// Normalized "table:key" reference string for a raw id
pub fn record_ref(table: &str, raw: &str) -> String {
    record_id(table, raw).to_string()
}

/// Base repository with database reference and generic document helpers
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Select a document by id regardless of owner
    pub async fn get<T: Document>(&self, id: &str) -> RepoResult<Option<T>> {
        let doc: Option<T> = self.db.select(record_id(T::TABLE, id)).await?;
        Ok(doc)
    }

    /// Select a document by id, only if it belongs to `owner`
    pub async fn get_owned<T: Owned>(&self, owner: &str, id: &str) -> RepoResult<Option<T>> {
        Ok(self.get::<T>(id).await?.filter(|doc| doc.owner() == owner))
    }

    /// Insert a new document (id generated by the database)
    pub async fn insert<T: Document>(&self, mut doc: T) -> RepoResult<T> {
        doc.take_id();
        let created: Option<T> = self.db.create(T::TABLE).content(doc).await?;
        created.ok_or_else(|| RepoError::Database(format!("Failed to create {}", T::TABLE)))
    }

    /// Write a whole document back under its id
    pub async fn save<T: Document>(&self, mut doc: T) -> RepoResult<T> {
        let id = doc
            .take_id()
            .ok_or_else(|| RepoError::Validation(format!("{} has no id", T::TABLE)))?;
        let updated: Option<T> = self.db.update(id.clone()).content(doc).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("{} not found", id)))
    }

    /// Hard delete
    pub async fn remove<T: Document>(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<T> = self.db.delete(record_id(T::TABLE, id)).await?;
        Ok(deleted.is_some())
    }

    /// Run a query with `$owner` bound and take the first statement's rows
    pub async fn query_owned<T: DeserializeOwned>(
        &self,
        sql: &str,
        owner: &str,
        binds: Vec<(&'static str, serde_json::Value)>,
    ) -> RepoResult<Vec<T>> {
        let mut query = self
            .db
            .query(sql.to_string())
            .bind(("owner", owner.to_string()));
        for (key, value) in binds {
            query = query.bind((key, value));
        }
        let rows: Vec<T> = query.await?.take(0)?;
        Ok(rows)
    }

    /// `SELECT count() ... GROUP ALL` helper
    pub async fn count_owned(
        &self,
        sql: &str,
        owner: &str,
        binds: Vec<(&'static str, serde_json::Value)>,
    ) -> RepoResult<u64> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: u64,
        }
        let rows: Vec<Count> = self.query_owned(sql, owner, binds).await?;
        Ok(rows.first().map(|c| c.count).unwrap_or(0))
    }
}
