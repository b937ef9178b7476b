//! 单例构建守卫
//!
//! 注册表本身不做并发控制。守卫为每个规范标识维护一个构建槽，
//! 同步和异步两条路径都必须先占住同一个槽才能执行创建器，
//! 保证同一单例最多构建一次。实例存储是唯一的缓存，槽只记录守卫完成过的构建。
//!
//! 注册表以 `parking_lot::RwLock` 共享，注册表锁不会跨越 `.await` 持有，
//! 创建器执行期间也不持有注册表锁。

use dashmap::DashMap;
use di_abstractions::{DefinitionRef, ObjectDefinition, ObjectDefinitionRegistry, ObjectInstance};
use ioc_common::{CoreError, CoreResult, ObjectIdentifier, PropertyValue};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 构建槽，持有时表示该标识正在构建
type BuildSlot = Arc<Mutex<Option<ObjectInstance>>>;

/// 单例构建守卫
#[derive(Debug, Default)]
pub struct SingletonGuard {
    slots: DashMap<ObjectIdentifier, BuildSlot>,
}

impl SingletonGuard {
    /// 创建新的守卫
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, canonical: &ObjectIdentifier) -> BuildSlot {
        self.slots
            .entry(canonical.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// 获取实例，不存在时执行工厂
    ///
    /// 并发调用方共享同一次工厂执行；工厂失败时不缓存错误，下一次调用会重试。
    /// 实例存储中的对象被清空或删除后会重新构建。
    pub async fn get_or_init<R, F, Fut>(
        &self,
        registry: &RwLock<R>,
        identifier: &str,
        factory: F,
    ) -> CoreResult<ObjectInstance>
    where
        R: ObjectDefinitionRegistry + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = CoreResult<ObjectInstance>>,
    {
        let canonical = {
            let guard = registry.read();
            let canonical = guard.resolve_identifier(identifier);
            if let Some(instance) = guard.get_object(canonical.as_str()) {
                return Ok(instance);
            }
            canonical
        };

        let slot = self.slot(&canonical);
        let mut built = slot.lock().await;
        let existing = registry.read().get_object(canonical.as_str());
        if let Some(existing) = existing {
            *built = Some(existing.clone());
            return Ok(existing);
        }
        if built.take().is_some() {
            debug!("实例存储中已没有 {}，重新构建", canonical);
        }

        debug!("开始构建单例: {}", canonical);
        let created = factory().await?;
        let instance = publish(registry, &canonical, created);
        *built = Some(instance.clone());
        Ok(instance)
    }

    /// 按定义的创建器构建单例
    ///
    /// 异步定义走 `create_async`。构造参数中的引用必须已存在于实例存储中。
    pub async fn get_or_create<R>(
        &self,
        registry: &RwLock<R>,
        identifier: &str,
    ) -> CoreResult<ObjectInstance>
    where
        R: ObjectDefinitionRegistry + ?Sized,
    {
        let definition = singleton_definition(&*registry.read(), identifier)?;

        self.get_or_init(registry, identifier, || async move {
            let creator = definition
                .creator()
                .cloned()
                .ok_or_else(|| CoreError::common(format!("{} has no creator", definition.name())))?;
            let args = constructor_args(&*registry.read(), definition.as_ref())?;

            let instance = if definition.is_async() {
                creator.create_async(args).await?
            } else {
                creator.create(args)?
            };
            bind(definition.as_ref(), &instance);
            Ok(instance)
        })
        .await
    }

    /// 同步构建单例
    ///
    /// 异步定义返回方法误用错误，应改用 [`SingletonGuard::get_or_create`]。
    /// 同一标识正在由异步路径构建时同样返回方法误用错误，不会再次执行创建器。
    pub fn get_sync<R>(&self, registry: &RwLock<R>, identifier: &str) -> CoreResult<ObjectInstance>
    where
        R: ObjectDefinitionRegistry + ?Sized,
    {
        let wrong_method = || {
            CoreError::use_wrong_method("get_sync", "get_or_create", Some(identifier.to_string()))
        };

        let (canonical, definition) = {
            let guard = registry.read();
            let definition = singleton_definition(&*guard, identifier)?;
            if definition.is_async() {
                return Err(wrong_method());
            }
            let canonical = guard.resolve_identifier(identifier);
            if let Some(instance) = guard.get_object(canonical.as_str()) {
                return Ok(instance);
            }
            (canonical, definition)
        };

        let slot = self.slot(&canonical);
        let Ok(mut built) = slot.try_lock() else {
            debug!("{} 正在构建，同步获取失败", canonical);
            return Err(wrong_method());
        };
        let existing = registry.read().get_object(canonical.as_str());
        if let Some(existing) = existing {
            *built = Some(existing.clone());
            return Ok(existing);
        }

        let creator = definition
            .creator()
            .ok_or_else(|| CoreError::common(format!("{} has no creator", definition.name())))?;
        let args = constructor_args(&*registry.read(), definition.as_ref())?;
        let created = creator.create(args)?;
        bind(definition.as_ref(), &created);

        let instance = publish(registry, &canonical, created);
        *built = Some(instance.clone());
        debug!("同步构建单例: {}", canonical);
        Ok(instance)
    }

    /// 丢弃单个单例，下一次获取时重新构建
    ///
    /// 等待进行中的构建结束后再删除实例存储中的对象。返回实例是否存在过。
    pub async fn invalidate<R>(&self, registry: &RwLock<R>, identifier: &str) -> bool
    where
        R: ObjectDefinitionRegistry + ?Sized,
    {
        let canonical = registry.read().resolve_identifier(identifier);
        let slot = self.slot(&canonical);
        let mut built = slot.lock().await;
        built.take();
        let removed = registry.write().remove_object(canonical.as_str());
        info!("丢弃单例: {} (实例存在: {})", canonical, removed);
        removed
    }

    /// 指定标识是否已经由守卫完成构建
    pub fn is_initialized(&self, canonical: &str) -> bool {
        let Some(slot) = self.slots.get(canonical).map(|slot| slot.clone()) else {
            return false;
        };
        let initialized = matches!(slot.try_lock(), Ok(built) if built.is_some());
        initialized
    }

    /// 丢弃所有构建状态，配合注册表 `clear_all` 使用
    pub fn reset(&self) {
        info!("重置单例守卫: {} 个条目", self.slots.len());
        self.slots.clear();
    }
}

/// 写入实例存储，守卫之外已写入的对象优先
fn publish<R>(registry: &RwLock<R>, canonical: &ObjectIdentifier, created: ObjectInstance) -> ObjectInstance
where
    R: ObjectDefinitionRegistry + ?Sized,
{
    let mut guard = registry.write();
    if let Some(existing) = guard.get_object(canonical.as_str()) {
        return existing;
    }
    guard.register_object(canonical, created.clone());
    created
}

fn bind(definition: &dyn ObjectDefinition, instance: &ObjectInstance) {
    if let Some(hook) = definition.bind_hook() {
        hook(instance, definition);
    }
}

fn singleton_definition<R>(
    registry: &R,
    identifier: &str,
) -> CoreResult<DefinitionRef>
where
    R: ObjectDefinitionRegistry + ?Sized,
{
    let definition = registry
        .get_definition(identifier)
        .ok_or_else(|| CoreError::definition_not_found(identifier))?;
    if !definition.is_singleton_scope() {
        return Err(CoreError::common(format!(
            "{} is {} scoped and can't be cached as a singleton",
            definition.name(),
            definition.scope()
        )));
    }
    Ok(definition)
}

fn constructor_args<R>(
    registry: &R,
    definition: &dyn ObjectDefinition,
) -> CoreResult<Vec<ObjectInstance>>
where
    R: ObjectDefinitionRegistry + ?Sized,
{
    definition
        .constructor_args()
        .iter()
        .map(|arg| match arg {
            PropertyValue::Reference(id) => registry.get_object(id.as_str()).ok_or_else(|| {
                CoreError::definition_not_found(id.clone()).with_requesting_class(definition.name())
            }),
            PropertyValue::Value(value) => Ok(Arc::new(value.clone()) as ObjectInstance),
            PropertyValue::Opaque(blob) => Ok(blob.as_shared()),
        })
        .collect()
}
