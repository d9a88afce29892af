use std::sync::Arc;
use std::time::Instant;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::checkout::CheckoutService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::gateway::{MockGateway, PaymentGateway};
use crate::ledger::CreditLedger;
use crate::services::{LogService, NotificationService, UploadService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | gateway | Arc<dyn PaymentGateway> | 支付网关 |
/// | started_at | Instant | 启动时间 (health uptime) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub started_at: Instant,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("work_dir", &self.config.work_dir)
            .field("environment", &self.config.environment)
            .finish()
    }
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let gateway: Arc<dyn PaymentGateway> = Arc::new(MockGateway::new(
            config.gateway_secret.clone(),
            config.gateway_base_url.clone(),
        ));
        Self {
            config,
            db,
            jwt_service,
            gateway,
            started_at: Instant::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 工作目录结构 (database / uploads / logs)
    /// 2. 数据库 (work_dir/database/shop.db, 或内存数据库)
    /// 3. JWT 与支付网关
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_service = if config.in_memory_db {
            DbService::new_in_memory().await
        } else {
            let db_path = config.database_dir().join("shop.db");
            DbService::new(&db_path.to_string_lossy()).await
        }
        .map_err(ServerError::Database)?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// 测试状态: 内存数据库
    pub async fn for_tests(config: Config) -> Result<Self> {
        let config = Config {
            in_memory_db: true,
            ..config
        };
        Self::initialize(&config).await
    }

    /// Replace the payment gateway
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(self.get_db(), self.gateway.clone(), self.config.low_stock_threshold)
    }

    pub fn ledger(&self) -> CreditLedger {
        CreditLedger::new(self.get_db())
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(self.get_db())
    }

    pub fn logs(&self) -> LogService {
        LogService::new(self.get_db())
    }

    pub fn uploads(&self) -> UploadService {
        UploadService::new(self.config.uploads_dir(), self.config.max_upload_bytes)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
