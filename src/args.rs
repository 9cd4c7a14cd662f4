use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 设计模式示例：服务定位器、全局单例、适配器
#[derive(Parser, Debug)]
#[command(name = "service-locator")]
#[command(about = "Service locator, global singleton and adapter pattern demos")]
pub struct Args {
    /// 子命令
    #[command(subcommand)]
    pub command: Command,

    /// 配置文件路径（默认 ~/.config/service-locator/config.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 日志级别，覆盖配置文件和环境变量
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 在全局定位器上注册并解析日志、数据访问服务
    Locator,
    /// 通过适配器调用不兼容的接口
    Adapter,
    /// 访问进程级单例槽位
    Singleton,
    /// 依次运行所有示例
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommand_with_global_flags() {
        let args = Args::try_parse_from(["service-locator", "locator", "--log-level", "debug"]).unwrap();

        assert_eq!(args.command, Command::Locator);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_config_path() {
        let args = Args::try_parse_from(["service-locator", "--config", "/tmp/x.toml", "all"]).unwrap();

        assert_eq!(args.command, Command::All);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["service-locator"]).is_err());
    }
}
