pub mod adapter;
pub mod locator;
pub mod singleton;

use crate::args::Command;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::infrastructure::ServiceLocator;
use crate::services::Logger;
use std::sync::Arc;

pub use adapter::handle_adapter;
pub use locator::{handle_locator, register_demo_services};
pub use singleton::handle_singleton;

/// 执行子命令，所有输出都经由 `logger`
pub fn run(
    command: Command,
    config: &AppConfig,
    locator: &ServiceLocator,
    logger: Arc<dyn Logger>,
) -> Result<(), AppError> {
    tracing::debug!(?command, "Running demo");
    match command {
        Command::Locator => handle_locator(config, locator, logger),
        Command::Adapter => handle_adapter(logger.as_ref()),
        Command::Singleton => handle_singleton(logger.as_ref()),
        Command::All => {
            handle_locator(config, locator, logger.clone())?;
            handle_adapter(logger.as_ref())?;
            handle_singleton(logger.as_ref())
        }
    }
}
