//! Shop Server - 小型店铺收银与赊账后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储, 所有文档按 `owner` 隔离
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **结账** (`checkout`): 购物车、订单、支付、销售
//! - **赊账账本** (`ledger`): 还款对账, 全部使用 Decimal 计算
//! - **支付网关** (`gateway`): 网关抽象与 mock 实现
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── checkout/      # 购物车 → 订单 → 支付 → 销售
//! ├── ledger/        # 金额运算与赊账对账
//! ├── gateway/       # 支付网关
//! ├── services/      # 通知、日志、上传、HTTP 中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use checkout::CheckoutService;
pub use core::{Config, Server, ServerState};
pub use gateway::{MockGateway, PaymentGateway};
pub use ledger::CreditLedger;
pub use services::https::build_router;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 `.env`, 创建工作目录, 初始化日志
pub fn setup_environment() -> Result<Config, core::ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let logs_dir = config.logs_dir();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        logs_dir.to_str(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
                /_/
    "#
    );
}
