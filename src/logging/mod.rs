use crate::errors::{AppError, ConfigError};
use std::str::FromStr;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志环境配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingEnvironment {
    /// 开发环境
    Development,
    /// 测试环境
    Testing,
    /// 生产环境
    Production,
}

impl FromStr for LoggingEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(invalid("logging.environment", s)),
        }
    }
}

/// 日志格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读格式
    Pretty,
    /// JSON 格式
    Json,
    /// 紧凑格式
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(invalid("logging.format", s)),
        }
    }
}

/// 解析日志级别（trace/debug/info/warn/error，大小写不敏感）
pub fn parse_level(s: &str) -> Result<Level, ConfigError> {
    Level::from_str(s.trim()).map_err(|_| invalid("logging.level", s))
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// 环境
    pub environment: LoggingEnvironment,
    /// 日志级别
    pub level: Level,
    /// 输出格式
    pub format: LogFormat,
    /// 是否显示目标模块
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            environment: LoggingEnvironment::Development,
            level: Level::INFO,
            format: LogFormat::Compact,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// 按环境名称选择预设
    pub fn for_environment(environment: LoggingEnvironment) -> Self {
        match environment {
            LoggingEnvironment::Development => Self::development(),
            LoggingEnvironment::Testing => Self::testing(),
            LoggingEnvironment::Production => Self::production(),
        }
    }

    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            environment: LoggingEnvironment::Development,
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            show_target: true,
            show_thread_ids: true,
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        Self {
            environment: LoggingEnvironment::Production,
            level: Level::INFO,
            format: LogFormat::Json,
            show_target: false,
            show_thread_ids: false,
        }
    }

    /// 创建测试环境配置
    pub fn testing() -> Self {
        Self {
            environment: LoggingEnvironment::Testing,
            level: Level::ERROR,
            format: LogFormat::Compact,
            show_target: false,
            show_thread_ids: false,
        }
    }
}

/// 初始化日志系统
///
/// 日志写到 stderr，stdout 只保留示例输出。`RUST_LOG` 优先于配置中的级别。
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level).into())
        .from_env_lossy();
    let ansi = config.environment != LoggingEnvironment::Production;

    let result = match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(ansi);

            tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids);

            tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(ansi);

            tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()
        }
    };
    result.map_err(|e| AppError::Logging(e.to_string()))?;

    tracing::debug!(
        environment = ?config.environment,
        level = %config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}

/// 操作性能计时器
pub struct OperationTimer {
    start: Instant,
    operation: String,
    finished: bool,
}

impl OperationTimer {
    /// 创建新的计时器
    pub fn new(operation: &str) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
            finished: false,
        }
    }

    /// 完成计时并记录日志
    pub fn finish(mut self) {
        self.finished = true;
        tracing::debug!(
            operation = %self.operation,
            duration_us = self.start.elapsed().as_micros() as u64,
            "Operation completed"
        );
    }

    /// 获取当前经过时间
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                operation = %self.operation,
                duration_us = self.start.elapsed().as_micros() as u64,
                "Operation abandoned"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_config_presets() {
        let dev_config = LoggingConfig::development();
        assert_eq!(dev_config.level, Level::DEBUG);
        assert_eq!(dev_config.format, LogFormat::Pretty);

        let prod_config = LoggingConfig::for_environment(LoggingEnvironment::Production);
        assert_eq!(prod_config, LoggingConfig::production());
        assert_eq!(prod_config.format, LogFormat::Json);

        let test_config = LoggingConfig::testing();
        assert_eq!(test_config.level, Level::ERROR);
        assert_eq!(test_config.format, LogFormat::Compact);
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("prod".parse::<LoggingEnvironment>().unwrap(), LoggingEnvironment::Production);
        assert_eq!(parse_level("warn").unwrap(), Level::WARN);
        assert_eq!(parse_level(" Debug ").unwrap(), Level::DEBUG);

        let err = parse_level("loud").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'loud' for logging.level");
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test_operation");
        assert_eq!(timer.operation, "test_operation");

        std::thread::sleep(Duration::from_millis(1));
        assert!(timer.elapsed() >= Duration::from_millis(1));

        timer.finish();
    }

    #[test]
    fn test_init_logging_twice_reports_error() {
        let config = LoggingConfig::testing();
        // 第一次可能因为其他测试已初始化而失败，第二次一定失败
        let _ = init_logging(&config);
        assert!(matches!(init_logging(&config), Err(AppError::Logging(_))));
    }
}
