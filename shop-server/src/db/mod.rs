//! Database Module
//!
//! Embedded SurrealDB (RocksDB on disk, in-memory for tests) and schema bootstrap

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "shop";
const DATABASE: &str = "main";

/// Tables are schemaless; indexes cover the lookups every request does
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE;
DEFINE TABLE IF NOT EXISTS customer SCHEMALESS;
DEFINE INDEX IF NOT EXISTS customer_owner ON customer FIELDS owner;
DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
DEFINE INDEX IF NOT EXISTS product_owner ON product FIELDS owner;
DEFINE TABLE IF NOT EXISTS cart SCHEMALESS;
DEFINE INDEX IF NOT EXISTS cart_owner ON cart FIELDS owner;
DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_owner ON order FIELDS owner;
DEFINE TABLE IF NOT EXISTS payment SCHEMALESS;
DEFINE INDEX IF NOT EXISTS payment_reference ON payment FIELDS reference UNIQUE;
DEFINE TABLE IF NOT EXISTS sale SCHEMALESS;
DEFINE INDEX IF NOT EXISTS sale_customer ON sale FIELDS customer;
DEFINE TABLE IF NOT EXISTS notification SCHEMALESS;
DEFINE INDEX IF NOT EXISTS notification_owner ON notification FIELDS owner;
DEFINE TABLE IF NOT EXISTS event SCHEMALESS;
DEFINE INDEX IF NOT EXISTS event_owner ON event FIELDS owner;
DEFINE TABLE IF NOT EXISTS log SCHEMALESS;
"#;

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_path, "Database connection established (SurrealDB RocksDB)");
        Self::bootstrap(db).await
    }

    /// In-memory database (tests)
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::bootstrap(db).await
    }

    async fn bootstrap(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}
