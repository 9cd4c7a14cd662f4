use crate::errors::AppError;
use crate::patterns::{Adaptee, ConcreteAdapter, Target};
use crate::services::Logger;

/// 适配器示例
pub fn handle_adapter(logger: &dyn Logger) -> Result<(), AppError> {
    let adapter: Box<dyn Target> = Box::new(ConcreteAdapter::new(Adaptee::new()));
    logger.log(&adapter.request())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ConsoleLogger, SharedBuffer};

    #[test]
    fn test_handle_adapter_output() {
        let buffer = SharedBuffer::new();

        handle_adapter(&ConsoleLogger::with_writer(buffer.clone())).unwrap();

        assert_eq!(buffer.contents(), "Called SpecificRequest()\n");
    }
}
