use super::logger::Logger;
use crate::errors::ServiceError;
use std::sync::Arc;

/// 数据访问服务契约
pub trait DataAccess: Send + Sync {
    fn load_data(&self) -> Result<Vec<String>, ServiceError>;
}

/// 内存数据源，加载前通过日志服务输出提示
pub struct InMemoryDataAccess {
    logger: Arc<dyn Logger>,
    records: Vec<String>,
}

impl InMemoryDataAccess {
    pub fn new(logger: Arc<dyn Logger>, records: Vec<String>) -> Self {
        Self { logger, records }
    }
}

impl DataAccess for InMemoryDataAccess {
    fn load_data(&self) -> Result<Vec<String>, ServiceError> {
        self.logger
            .log("Loading data...")
            .map_err(|err| ServiceError::DataAccess(Box::new(err)))?;

        tracing::debug!(records = self.records.len(), "Data loaded");
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::logger::{ConsoleLogger, SharedBuffer};

    struct BrokenLogger;

    impl Logger for BrokenLogger {
        fn log(&self, _message: &str) -> Result<(), ServiceError> {
            Err(ServiceError::Logging(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_load_data_announces_and_returns_records() {
        let buffer = SharedBuffer::new();
        let access = InMemoryDataAccess::new(
            Arc::new(ConsoleLogger::with_writer(buffer.clone())),
            vec!["alpha".to_string(), "beta".to_string()],
        );

        let records = access.load_data().unwrap();

        assert_eq!(records, vec!["alpha", "beta"]);
        assert_eq!(buffer.contents(), "Loading data...\n");
    }

    #[test]
    fn test_load_data_wraps_logger_failure() {
        let access = InMemoryDataAccess::new(Arc::new(BrokenLogger), Vec::new());

        let err = access.load_data().unwrap_err();
        assert!(matches!(err, ServiceError::DataAccess(_)));
        assert_eq!(err.to_string(), "Failed to load data.");
    }
}
