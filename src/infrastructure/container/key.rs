//! 服务契约标识
//!
//! 服务既可以按类型注册（`ServiceKey::of::<dyn Logger>()`），
//! 也可以按接口名称注册（`ServiceKey::named("logger")`）。

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 服务契约标识
#[derive(Debug, Clone)]
pub enum ServiceKey {
    /// 类型标签，比较和哈希只使用 `TypeId`
    Type {
        id: TypeId,
        name: &'static str,
    },
    /// 接口名称
    Named(Cow<'static, str>),
}

impl ServiceKey {
    /// 按类型构造标识，`T` 可以是 trait object
    pub fn of<T: ?Sized + 'static>() -> Self {
        ServiceKey::Type {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 按名称构造标识
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        ServiceKey::Named(name.into())
    }

    /// 用于日志和错误信息的可读名称
    pub fn name(&self) -> &str {
        match self {
            ServiceKey::Type { name, .. } => name,
            ServiceKey::Named(name) => name,
        }
    }

    /// 去掉模块路径和 `dyn ` 前缀后的短名称
    pub fn short_name(&self) -> &str {
        short_type_name(self.name())
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ServiceKey::Type { id: a, .. }, ServiceKey::Type { id: b, .. }) => a == b,
            (ServiceKey::Named(a), ServiceKey::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ServiceKey::Type { id, .. } => {
                0u8.hash(state);
                id.hash(state);
            }
            ServiceKey::Named(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKey::Type { name, .. } => write!(f, "{}", name),
            ServiceKey::Named(name) => write!(f, "\"{}\"", name),
        }
    }
}

/// `dyn my_crate::services::Logger + core::marker::Send` -> `Logger`
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.trim_start_matches("dyn ");
    // `dyn Logger + Send` 只保留主 trait
    let base = match (base.find(" + "), base.find('<')) {
        (Some(plus), lt) if lt.map_or(true, |lt| plus < lt) => &base[..plus],
        _ => base,
    };
    // 泛型参数里也可能出现 `::`，只看 `<` 之前的部分
    let end = base.find('<').unwrap_or(base.len());
    match base[..end].rfind("::") {
        Some(pos) => &base[pos + 2..],
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    trait Contract {}
    struct Impl;

    #[test]
    fn test_type_keys_compare_by_type_id() {
        assert_eq!(ServiceKey::of::<Impl>(), ServiceKey::of::<Impl>());
        assert_ne!(ServiceKey::of::<Impl>(), ServiceKey::of::<dyn Contract>());
    }

    #[test]
    fn test_named_and_type_keys_never_collide() {
        let mut keys = HashSet::new();
        keys.insert(ServiceKey::of::<Impl>());
        keys.insert(ServiceKey::named(std::any::type_name::<Impl>()));
        keys.insert(ServiceKey::named("logger"));
        keys.insert(ServiceKey::named(String::from("logger")));

        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(ServiceKey::of::<dyn Contract>().short_name(), "Contract");
        assert_eq!(ServiceKey::named("logger").short_name(), "logger");
        assert_eq!(short_type_name("alloc::sync::Arc<core::cell::Cell<u8>>"), "Arc<core::cell::Cell<u8>>");
    }

    #[test]
    fn test_short_name_ignores_auto_trait_bounds() {
        assert_eq!(short_type_name("dyn my_crate::Logger + core::marker::Send"), "Logger");
        assert_eq!(
            short_type_name("dyn my_crate::Logger + core::marker::Send + core::marker::Sync"),
            "Logger"
        );
        assert_eq!(ServiceKey::of::<dyn Contract + Send>().short_name(), "Contract");
    }

    #[test]
    fn test_display() {
        assert_eq!(ServiceKey::named("db").to_string(), "\"db\"");
        assert!(ServiceKey::of::<Impl>().to_string().ends_with("Impl"));
    }
}
