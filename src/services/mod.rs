//! 示例服务：通过服务定位器注册和解析的日志与数据访问契约

pub mod data_access;
pub mod logger;

pub use data_access::{DataAccess, InMemoryDataAccess};
pub use logger::{ConsoleLogger, Logger, SharedBuffer};
