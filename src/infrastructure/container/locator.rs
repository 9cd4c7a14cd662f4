//! 服务定位器实现
//!
//! - 单一并发表：标识 -> 条目（工厂 / 单例）
//! - 工厂条目惰性构造，首次解析后缓存，工厂最多执行一次
//! - 重复注册（任意组合）一律拒绝
//! - 解析时进行类型检查的向下转型
//! - 按线程记录解析栈，检测工厂之间的循环依赖

use super::error::{BoxError, LocatorError};
use super::key::ServiceKey;
use super::{EntryKind, EntryState, ServiceDescriptor};
use crate::infrastructure::singleton::Singleton;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 类型擦除后的实例，内部保存的是 `Arc<T>`
type ErasedService = Box<dyn Any + Send + Sync>;

type ErasedFactory =
    Box<dyn Fn(&ServiceLocator) -> Result<ErasedService, BoxError> + Send + Sync>;

/// 注册条目
enum ServiceEntry {
    Factory {
        factory: ErasedFactory,
        instance: OnceCell<ErasedService>,
        type_name: &'static str,
    },
    Singleton {
        instance: ErasedService,
        type_name: &'static str,
    },
}

impl ServiceEntry {
    fn kind(&self) -> EntryKind {
        match self {
            ServiceEntry::Factory { .. } => EntryKind::Factory,
            ServiceEntry::Singleton { .. } => EntryKind::Singleton,
        }
    }

    fn state(&self) -> EntryState {
        match self {
            ServiceEntry::Factory { instance, .. } if instance.get().is_none() => {
                EntryState::Uninitialized
            }
            _ => EntryState::Initialized,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ServiceEntry::Factory { type_name, .. } | ServiceEntry::Singleton { type_name, .. } => {
                *type_name
            }
        }
    }
}

thread_local! {
    /// 当前线程上正在构造的服务，按（注册表地址，标识）区分不同的定位器
    static RESOLUTION_STACK: RefCell<Vec<(usize, ServiceKey)>> = const { RefCell::new(Vec::new()) };
}

/// 工厂执行期间把标识压入解析栈，离开作用域时弹出
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(registry: usize, key: &ServiceKey) -> Result<Self, LocatorError> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().position(|(owner, k)| *owner == registry && k == key) {
                let mut chain: Vec<String> = stack[pos..]
                    .iter()
                    .filter(|(owner, _)| *owner == registry)
                    .map(|(_, k)| k.to_string())
                    .collect();
                chain.push(key.to_string());
                return Err(LocatorError::CircularDependency { chain });
            }
            stack.push((registry, key.clone()));
            Ok(ResolutionGuard)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// 内部统计信息（原子计数器）
#[derive(Default)]
struct InnerStats {
    registrations: AtomicUsize,
    rejected_registrations: AtomicUsize,
    resolutions: AtomicUsize,
    singleton_hits: AtomicUsize,
    factory_cache_hits: AtomicUsize,
    factory_invocations: AtomicUsize,
    failed_resolutions: AtomicUsize,
}

impl InnerStats {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

static GLOBAL_LOCATOR: Singleton<ServiceLocator> = Singleton::new(ServiceLocator::new);

/// 服务定位器
///
/// 克隆得到的是同一张注册表的另一个句柄。
#[derive(Clone)]
pub struct ServiceLocator {
    entries: Arc<DashMap<ServiceKey, Arc<ServiceEntry>>>,
    stats: Arc<InnerStats>,
}

impl ServiceLocator {
    /// 创建独立的空注册表
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            stats: Arc::new(InnerStats::default()),
        }
    }

    /// 进程级共享的注册表，首次访问时创建，之后不会销毁
    pub fn global() -> &'static ServiceLocator {
        GLOBAL_LOCATOR.get()
    }

    /// 按类型注册工厂，首次解析时才构造
    pub fn register_factory<T, F>(&self, factory: F) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register_factory_keyed(ServiceKey::of::<T>(), factory)
    }

    /// 以显式标识注册工厂
    pub fn register_factory_keyed<T, F>(&self, key: ServiceKey, factory: F) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register_factory_with_keyed::<T, _>(key, move |_| Ok(factory()))
    }

    /// 注册可以从定位器解析依赖、且可能失败的工厂
    ///
    /// 工厂失败时返回 [`LocatorError::CreationFailed`]，不缓存结果，下次解析会重试。
    pub fn register_factory_with<T, F>(&self, factory: F) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceLocator) -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        self.register_factory_with_keyed(ServiceKey::of::<T>(), factory)
    }

    pub fn register_factory_with_keyed<T, F>(
        &self,
        key: ServiceKey,
        factory: F,
    ) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceLocator) -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let factory: ErasedFactory = Box::new(
            move |locator: &ServiceLocator| -> Result<ErasedService, BoxError> {
                let service = factory(locator)?;
                Ok(Box::new(service))
            },
        );

        self.insert(
            key,
            ServiceEntry::Factory {
                factory,
                instance: OnceCell::new(),
                type_name: std::any::type_name::<T>(),
            },
        )
    }

    /// 按类型注册已构造好的实例
    pub fn register_singleton<T>(&self, instance: Arc<T>) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register_singleton_keyed(ServiceKey::of::<T>(), instance)
    }

    pub fn register_singleton_keyed<T>(&self, key: ServiceKey, instance: Arc<T>) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert(
            key,
            ServiceEntry::Singleton {
                instance: Box::new(instance),
                type_name: std::any::type_name::<T>(),
            },
        )
    }

    /// 按类型解析服务
    pub fn resolve<T>(&self) -> Result<Arc<T>, LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_keyed(&ServiceKey::of::<T>())
    }

    /// 按显式标识解析服务，并检查实例类型是否为 `Arc<T>`
    pub fn resolve_keyed<T>(&self, key: &ServiceKey) -> Result<Arc<T>, LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        InnerStats::bump(&self.stats.resolutions);

        let result = self.resolve_entry::<T>(key);
        if let Err(err) = &result {
            InnerStats::bump(&self.stats.failed_resolutions);
            tracing::warn!(service = %key, error = %err, "Service resolution failed");
        }
        result
    }

    fn resolve_entry<T>(&self, key: &ServiceKey) -> Result<Arc<T>, LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        // 先把条目克隆出来再释放分片锁，工厂里可以继续解析其他服务
        let entry = self.entries.get(key).map(|e| Arc::clone(e.value()));
        let Some(entry) = entry else {
            return Err(self.not_registered(key));
        };

        let erased = match entry.as_ref() {
            ServiceEntry::Singleton { instance, .. } => {
                InnerStats::bump(&self.stats.singleton_hits);
                instance
            }
            ServiceEntry::Factory { factory, instance, .. } => match instance.get() {
                Some(cached) => {
                    InnerStats::bump(&self.stats.factory_cache_hits);
                    cached
                }
                None => {
                    let _guard = ResolutionGuard::enter(self.registry_id(), key)?;
                    instance
                        .get_or_try_init(|| {
                            InnerStats::bump(&self.stats.factory_invocations);
                            tracing::debug!(service = %key, "Constructing service from factory");
                            factory(self)
                        })
                        .map_err(|source| creation_failed(key, source))?
                }
            },
        };

        downcast::<T>(key, erased, entry.type_name())
    }

    /// 克隆出来的句柄共享同一个注册表，因此共享同一个标识
    fn registry_id(&self) -> usize {
        Arc::as_ptr(&self.entries) as usize
    }

    /// 类型是否已注册
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_key(&ServiceKey::of::<T>())
    }

    pub fn contains_key(&self, key: &ServiceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// 标识当前所处的生命周期阶段
    pub fn state(&self, key: &ServiceKey) -> EntryState {
        self.entries
            .get(key)
            .map(|entry| entry.state())
            .unwrap_or(EntryState::Unregistered)
    }

    /// 已注册服务列表，按名称排序
    pub fn services(&self) -> Vec<ServiceDescriptor> {
        let mut services: Vec<ServiceDescriptor> = self
            .entries
            .iter()
            .map(|item| ServiceDescriptor {
                key: item.key().clone(),
                kind: item.value().kind(),
                state: item.value().state(),
                type_name: item.value().type_name(),
            })
            .collect();
        services.sort_by(|a, b| a.key.name().cmp(b.key.name()));
        services
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取统计信息快照
    pub fn stats(&self) -> LocatorStats {
        let load = |counter: &AtomicUsize| counter.load(Ordering::Relaxed);
        LocatorStats {
            registered_services: self.entries.len(),
            registrations: load(&self.stats.registrations),
            rejected_registrations: load(&self.stats.rejected_registrations),
            resolutions: load(&self.stats.resolutions),
            singleton_hits: load(&self.stats.singleton_hits),
            factory_cache_hits: load(&self.stats.factory_cache_hits),
            factory_invocations: load(&self.stats.factory_invocations),
            failed_resolutions: load(&self.stats.failed_resolutions),
        }
    }

    fn insert(&self, key: ServiceKey, entry: ServiceEntry) -> Result<(), LocatorError> {
        let kind = entry.kind();
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                let key = occupied.key().clone();
                let existing = occupied.get().kind();
                drop(occupied);

                InnerStats::bump(&self.stats.rejected_registrations);
                tracing::warn!(
                    service = %key,
                    existing = %existing,
                    attempted = %kind,
                    "Rejected duplicate service registration"
                );
                Err(LocatorError::DuplicateRegistration { key, existing })
            }
            Entry::Vacant(vacant) => {
                tracing::debug!(service = %vacant.key(), kind = %kind, "Service registered");
                vacant.insert(Arc::new(entry));
                InnerStats::bump(&self.stats.registrations);
                Ok(())
            }
        }
    }

    fn not_registered(&self, key: &ServiceKey) -> LocatorError {
        let registered: Vec<ServiceKey> = self
            .services()
            .into_iter()
            .map(|descriptor| descriptor.key)
            .collect();
        let available = registered.iter().map(ToString::to_string).collect();

        let wanted = key.short_name().to_ascii_lowercase();
        let suggestion = registered
            .iter()
            .find(|candidate| {
                let name = candidate.short_name().to_ascii_lowercase();
                !wanted.is_empty() && (name == wanted || name.contains(&wanted) || wanted.contains(&name))
            })
            .map(|candidate| candidate.to_string());

        LocatorError::NotRegistered {
            key: key.clone(),
            available,
            suggestion,
        }
    }
}

impl Default for ServiceLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// 嵌套工厂里的循环依赖直接向上传递，其他错误包装为创建失败
fn creation_failed(key: &ServiceKey, source: BoxError) -> LocatorError {
    match source.downcast::<LocatorError>() {
        Ok(inner) if matches!(*inner, LocatorError::CircularDependency { .. }) => *inner,
        Ok(inner) => LocatorError::CreationFailed {
            key: key.clone(),
            source: inner,
        },
        Err(source) => LocatorError::CreationFailed {
            key: key.clone(),
            source,
        },
    }
}

fn downcast<T>(key: &ServiceKey, erased: &ErasedService, actual: &'static str) -> Result<Arc<T>, LocatorError>
where
    T: ?Sized + Send + Sync + 'static,
{
    (**erased)
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| LocatorError::TypeMismatch {
            key: key.clone(),
            expected: std::any::type_name::<T>(),
            actual,
        })
}

/// 定位器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorStats {
    pub registered_services: usize,
    pub registrations: usize,
    pub rejected_registrations: usize,
    pub resolutions: usize,
    pub singleton_hits: usize,
    /// 工厂条目已构造、直接返回缓存的次数
    pub factory_cache_hits: usize,
    pub factory_invocations: usize,
    pub failed_resolutions: usize,
}

impl LocatorStats {
    /// 无需构造即可返回实例的解析占比
    pub fn hit_rate(&self) -> f64 {
        if self.resolutions == 0 {
            0.0
        } else {
            (self.singleton_hits + self.factory_cache_hits) as f64 / self.resolutions as f64
        }
    }

    /// 性能指标摘要
    pub fn summary(&self) -> String {
        format!(
            "Locator: {} services, {} resolutions, {:.1}% hit rate, {} factory invocations, {} failures",
            self.registered_services,
            self.resolutions,
            self.hit_rate() * 100.0,
            self.factory_invocations,
            self.failed_resolutions
        )
    }
}
