use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传文件、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 默认日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | MAX_UPLOAD_BYTES | 5242880 | 上传大小上限 |
/// | GATEWAY_SECRET | mock-gateway-secret | 支付回调签名密钥 |
/// | GATEWAY_BASE_URL | https://pay.mock.local | 支付页面前缀 (为空时网关不可用) |
/// | LOW_STOCK_THRESHOLD | 5 | 低库存提醒阈值 |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/shop HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 上传文件大小上限 (字节)
    pub max_upload_bytes: usize,
    /// Mock gateway signing key
    pub gateway_secret: String,
    pub gateway_base_url: String,
    /// Stock level at or below which a low-stock notification is emitted
    pub low_stock_threshold: i64,
    /// In-memory database (tests)
    pub in_memory_db: bool,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            gateway_secret: std::env::var("GATEWAY_SECRET")
                .unwrap_or_else(|_| "mock-gateway-secret".into()),
            gateway_base_url: std::env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "https://pay.mock.local".into()),
            low_stock_threshold: env_or("LOW_STOCK_THRESHOLD", 5),
            in_memory_db: false,
        }
    }

    /// 测试配置 (不读取环境变量, 使用内存数据库)
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough-0123456789".into(),
                expiration_minutes: 60,
                issuer: "shop-server".into(),
                audience: "shop-clients".into(),
            },
            environment: "test".into(),
            log_level: "warn".into(),
            log_json: false,
            request_timeout_ms: 30_000,
            max_upload_bytes: 5 * 1024 * 1024,
            gateway_secret: "test-gateway-secret".into(),
            gateway_base_url: "https://pay.test.local".into(),
            low_stock_threshold: 5,
            in_memory_db: true,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads").join("images")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.uploads_dir())?;
        if !self.in_memory_db {
            std::fs::create_dir_all(self.database_dir())?;
            std::fs::create_dir_all(self.logs_dir())?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let config = Config::for_tests("/tmp/shop");
        assert_eq!(config.uploads_dir(), PathBuf::from("/tmp/shop/uploads/images"));
        assert_eq!(config.database_dir(), PathBuf::from("/tmp/shop/database"));
        assert!(!config.is_production());
        assert!(config.in_memory_db);
    }
}
