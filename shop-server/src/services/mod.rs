//! 服务层 - 跨资源的辅助服务
//!
//! # 服务列表
//!
//! - [`NotificationService`] - 店主站内通知 (best effort)
//! - [`LogService`] - 活动日志与系统错误上报
//! - [`UploadService`] - 图片上传存储 (去重, 重新编码)

pub mod https;
pub mod log;
pub mod notification;
pub mod upload;

pub use log::LogService;
pub use notification::NotificationService;
pub use upload::{StoredFile, UploadService};
