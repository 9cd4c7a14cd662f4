use crate::errors::ServiceError;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// 日志服务契约
pub trait Logger: Send + Sync {
    fn log(&self, message: &str) -> Result<(), ServiceError>;
}

/// 逐行写出消息的日志实现，默认写到标准输出
pub struct ConsoleLogger {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleLogger {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// 写到指定输出（测试中常用 [`SharedBuffer`]）
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) -> Result<(), ServiceError> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", message)
            .and_then(|_| writer.flush())
            .map_err(ServiceError::Logging)
    }
}

/// 可克隆的内存输出，所有克隆共享同一缓冲区
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
