//! 基础设施层
//!
//! - 服务定位器（类型擦除的服务注册表）
//! - 进程级单例槽位

pub mod container;
pub mod singleton;

// 重新导出API
pub use container::{
    BoxError, EntryKind, EntryState, LocatorError, LocatorStats, ServiceDescriptor, ServiceKey,
    ServiceLocator,
};
pub use singleton::Singleton;
