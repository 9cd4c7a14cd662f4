//! 进程级单例槽位
//!
//! 用显式的静态槽位加幂等初始化函数表达“全局唯一实例”：
//!
//! ```
//! use service_locator::infrastructure::Singleton;
//!
//! struct Settings {
//!     name: &'static str,
//! }
//!
//! static SETTINGS: Singleton<Settings> = Singleton::new(|| Settings { name: "demo" });
//!
//! assert!(!SETTINGS.is_initialized());
//! assert_eq!(SETTINGS.get().name, "demo");
//! assert!(SETTINGS.is_initialized());
//! ```

use crate::infrastructure::container::LocatorError;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::thread::{self, ThreadId};

/// 惰性创建、只初始化一次的全局实例
pub struct Singleton<T> {
    cell: OnceCell<T>,
    init: fn() -> T,
    /// 正在执行初始化函数的线程
    initializing: Mutex<Option<ThreadId>>,
}

impl<T> Singleton<T> {
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            cell: OnceCell::new(),
            init,
            initializing: parking_lot::const_mutex(None),
        }
    }

    /// 获取实例，首次调用时执行初始化函数
    ///
    /// # Panics
    ///
    /// 初始化函数在同一线程上再次访问本槽位时 panic，使用 [`Singleton::try_get`] 可以得到错误而不是 panic。
    pub fn get(&self) -> &T {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// 获取实例；初始化函数重入时返回 [`LocatorError::ReentrantInitialization`]
    pub fn try_get(&self) -> Result<&T, LocatorError> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let current = thread::current().id();
        if *self.initializing.lock() == Some(current) {
            return Err(LocatorError::ReentrantInitialization {
                type_name: std::any::type_name::<T>(),
            });
        }

        // 其他线程正在初始化时会在这里阻塞等待
        Ok(self.cell.get_or_init(|| {
            let _owner = InitOwner::claim(&self.initializing, current);
            tracing::debug!(instance = std::any::type_name::<T>(), "Initializing global instance");
            (self.init)()
        }))
    }

    /// 已初始化时返回实例，不触发初始化
    pub fn get_if_initialized(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// 初始化期间记录所属线程，离开作用域（包括 panic 展开）时清除
struct InitOwner<'a> {
    slot: &'a Mutex<Option<ThreadId>>,
}

impl<'a> InitOwner<'a> {
    fn claim(slot: &'a Mutex<Option<ThreadId>>, thread: ThreadId) -> Self {
        *slot.lock() = Some(thread);
        Self { slot }
    }
}

impl Drop for InitOwner<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}
