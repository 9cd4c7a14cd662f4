use crate::errors::AppError;
use crate::infrastructure::{ServiceLocator, Singleton};
use crate::services::Logger;
use std::sync::atomic::{AtomicUsize, Ordering};

static CREATED: AtomicUsize = AtomicUsize::new(0);

/// 示例全局实例
pub struct DemoInstance {
    sequence: usize,
}

impl DemoInstance {
    fn new() -> Self {
        Self {
            sequence: CREATED.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    pub fn do_something(&self) -> String {
        format!("Singleton instance #{} doing something", self.sequence)
    }
}

pub static DEMO_INSTANCE: Singleton<DemoInstance> = Singleton::new(DemoInstance::new);

/// 全局实例被构造的次数
pub fn instances_created() -> usize {
    CREATED.load(Ordering::SeqCst)
}

/// 单例示例
pub fn handle_singleton(logger: &dyn Logger) -> Result<(), AppError> {
    let first = DEMO_INSTANCE.try_get()?;
    let second = DEMO_INSTANCE.try_get()?;

    logger.log(&first.do_something())?;
    logger.log(&format!("Same instance on every access: {}", std::ptr::eq(first, second)))?;
    logger.log(&format!(
        "Global locator is shared: {}",
        std::ptr::eq(ServiceLocator::global(), ServiceLocator::global())
    ))?;
    Ok(())
}
