//! 服务定位器错误类型

use super::key::ServiceKey;
use super::EntryKind;
use thiserror::Error;

/// 工厂返回的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 服务定位器错误
#[derive(Debug, Error)]
pub enum LocatorError {
    /// 同一标识已存在注册（无论是工厂还是单例）
    #[error("Service {key} is already registered as a {existing} entry")]
    DuplicateRegistration { key: ServiceKey, existing: EntryKind },

    /// 服务未注册 - 附带已注册服务和拼写建议
    #[error("Service {key} is not registered{}", describe_alternatives(.available, .suggestion))]
    NotRegistered {
        key: ServiceKey,
        available: Vec<String>,
        suggestion: Option<String>,
    },

    /// 已注册实例与调用方期望的类型不一致
    #[error("Type cast failed for service {key}: expected '{expected}', found '{actual}'")]
    TypeMismatch {
        key: ServiceKey,
        expected: &'static str,
        actual: &'static str,
    },

    /// 工厂在构造过程中（直接或间接）解析了自身
    #[error("Circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// 工厂返回了错误，实例未被缓存
    #[error("Failed to create service {key}: {source}")]
    CreationFailed {
        key: ServiceKey,
        #[source]
        source: BoxError,
    },

    /// 全局槽位的初始化函数在同一线程上重入
    #[error("Re-entrant initialization of global instance '{type_name}'")]
    ReentrantInitialization { type_name: &'static str },
}

impl LocatorError {
    /// 错误是否由注册阶段产生
    pub fn is_registration_error(&self) -> bool {
        matches!(self, LocatorError::DuplicateRegistration { .. })
    }
}

fn describe_alternatives(available: &[String], suggestion: &Option<String>) -> String {
    let mut out = String::new();
    if !available.is_empty() {
        out.push_str(". Available services: ");
        out.push_str(&available.join(", "));
    }
    if let Some(suggestion) = suggestion {
        out.push_str(". Did you mean: ");
        out.push_str(suggestion);
        out.push('?');
    }
    out
}
