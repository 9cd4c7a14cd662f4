use crate::config::AppConfig;
use crate::errors::AppError;
use crate::infrastructure::{LocatorError, ServiceLocator};
use crate::logging::OperationTimer;
use crate::services::{ConsoleLogger, DataAccess, InMemoryDataAccess, Logger};
use std::sync::Arc;

/// 注册示例服务：日志为单例，数据访问为依赖日志的工厂
pub fn register_demo_services(
    locator: &ServiceLocator,
    logger: Arc<dyn Logger>,
    records: Vec<String>,
) -> Result<(), LocatorError> {
    locator.register_singleton::<dyn Logger>(logger)?;
    locator.register_factory_with::<dyn DataAccess, _>(move |locator| {
        let logger = locator.resolve::<dyn Logger>()?;
        Ok(Arc::new(InMemoryDataAccess::new(logger, records.clone())) as Arc<dyn DataAccess>)
    })?;
    Ok(())
}

/// 服务定位器示例
pub fn handle_locator(
    config: &AppConfig,
    locator: &ServiceLocator,
    logger: Arc<dyn Logger>,
) -> Result<(), AppError> {
    let timer = OperationTimer::new("locator_demo");

    register_demo_services(locator, logger, config.demo.records.clone())?;

    let logger = locator.resolve::<dyn Logger>()?;
    let data_access = locator.resolve::<dyn DataAccess>()?;

    logger.log(&config.demo.message)?;
    let records = data_access.load_data()?;
    logger.log(&format!("Loaded {} records: {}", records.len(), records.join(", ")))?;

    // 同一契约的第二次注册会被拒绝
    let duplicate = locator
        .register_factory::<dyn Logger, _>(|| Arc::new(ConsoleLogger::stdout()) as Arc<dyn Logger>);
    report_duplicate(logger.as_ref(), duplicate)?;

    tracing::info!(summary = %locator.stats().summary(), "Locator demo finished");
    timer.finish();
    Ok(())
}

fn report_duplicate(logger: &dyn Logger, outcome: Result<(), LocatorError>) -> Result<(), AppError> {
    match outcome {
        Err(err) => logger.log(&format!("Second registration rejected: {}", err))?,
        Ok(()) => {
            tracing::warn!("Duplicate registration was accepted");
            logger.log("Second registration was accepted; duplicates are not being rejected")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{EntryState, ServiceKey};
    use crate::services::SharedBuffer;

    #[test]
    fn test_handle_locator_output() {
        let buffer = SharedBuffer::new();
        let locator = ServiceLocator::new();
        let mut config = AppConfig::default();
        config.demo.records = vec!["one".to_string()];

        handle_locator(&config, &locator, Arc::new(ConsoleLogger::with_writer(buffer.clone()))).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines[0], "This is a log message.");
        assert_eq!(lines[1], "Loading data...");
        assert_eq!(lines[2], "Loaded 1 records: one");
        assert!(lines[3].starts_with("Second registration rejected: "));
        assert_eq!(locator.state(&ServiceKey::of::<dyn DataAccess>()), EntryState::Initialized);
    }

    #[test]
    fn test_data_access_is_lazy() {
        let locator = ServiceLocator::new();
        register_demo_services(&locator, Arc::new(ConsoleLogger::with_writer(SharedBuffer::new())), Vec::new())
            .unwrap();

        assert_eq!(locator.state(&ServiceKey::of::<dyn DataAccess>()), EntryState::Uninitialized);
        assert_eq!(locator.state(&ServiceKey::of::<dyn Logger>()), EntryState::Initialized);
    }

    #[test]
    fn test_running_twice_on_same_locator_fails() {
        let locator = ServiceLocator::new();
        let config = AppConfig::default();
        let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::with_writer(SharedBuffer::new()));

        handle_locator(&config, &locator, logger.clone()).unwrap();
        let err = handle_locator(&config, &locator, logger).unwrap_err();

        assert!(matches!(err, AppError::Locator(LocatorError::DuplicateRegistration { .. })));
    }

    #[test]
    fn test_accepted_duplicate_is_reported() {
        let buffer = SharedBuffer::new();
        let logger = ConsoleLogger::with_writer(buffer.clone());

        report_duplicate(&logger, Ok(())).unwrap();

        assert_eq!(
            buffer.lines(),
            vec!["Second registration was accepted; duplicates are not being rejected"]
        );
    }
}
