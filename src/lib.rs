//! 设计模式示例库
//!
//! - [`infrastructure::ServiceLocator`]：按契约标识注册、解析服务的类型擦除注册表
//! - [`infrastructure::Singleton`]：惰性初始化的进程级单例槽位
//! - [`patterns::adapter`]：适配器模式

pub mod args;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod logging;
pub mod patterns;
pub mod services;

// Re-export commonly used items for convenience
pub use config::AppConfig;
pub use errors::{AppError, ServiceError};
pub use infrastructure::{LocatorError, ServiceKey, ServiceLocator, Singleton};
