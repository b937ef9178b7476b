//! 容器启动器

use crate::logging::{init_logging, LoggingConfig};
use di_abstractions::{
    DefinitionRef, DependencyResolver, ObjectDefinitionRegistry, ObjectInstance, ResolutionPlan,
};
use di_impl::{DefinitionResolver, ObjectDefinitionRegistryImpl, SingletonGuard};
use ioc_common::{CoreError, CoreResult, ObjectIdentifier, RegistrySettings};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 共享的对象定义注册表
pub type SharedRegistry = Arc<RwLock<ObjectDefinitionRegistryImpl>>;

/// 容器启动器
///
/// 负责把扫描得到的定义写入注册表并保存别名，启动前验证作用域约束，
/// 热重载时清空注册表和单例状态。
pub struct ContainerBootstrapper {
    /// 注册表配置
    settings: RegistrySettings,
    /// 日志配置，未设置时使用配置文件中的日志段
    logging_config: Option<LoggingConfig>,
    registry: SharedRegistry,
    singletons: Arc<SingletonGuard>,
}

impl ContainerBootstrapper {
    /// 使用默认配置创建启动器
    pub fn new() -> Self {
        Self::with_settings(RegistrySettings::default())
    }

    /// 使用指定配置创建启动器
    pub fn with_settings(settings: RegistrySettings) -> Self {
        let registry = ObjectDefinitionRegistryImpl::from_settings(&settings);
        Self {
            settings,
            logging_config: None,
            registry: Arc::new(RwLock::new(registry)),
            singletons: Arc::new(SingletonGuard::new()),
        }
    }

    /// 从配置文件创建启动器，环境变量覆盖文件中的值
    pub fn with_settings_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let settings = RegistrySettings::from_file(path)?;
        info!("已加载注册表配置: {:?}", settings);
        Ok(Self::with_settings(settings))
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 初始化日志系统
    pub fn init_logging(&self) -> CoreResult<bool> {
        let config = self
            .logging_config
            .clone()
            .unwrap_or_else(|| LoggingConfig::from_settings(&self.settings.logging));
        init_logging(&config)
    }

    /// 当前配置
    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// 共享的注册表
    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    /// 单例构建守卫
    pub fn singletons(&self) -> Arc<SingletonGuard> {
        self.singletons.clone()
    }

    /// 注册类形态的定义
    ///
    /// 未指定命名空间时使用配置中的默认命名空间。严格模式下先检查类名冲突。
    /// 返回定义的规范标识。
    pub fn register_class(
        &self,
        definition: DefinitionRef,
        namespace: Option<&str>,
    ) -> CoreResult<ObjectIdentifier> {
        let namespace = namespace
            .or(definition.namespace())
            .or(self.settings.default_namespace.as_deref())
            .map(str::to_string);
        let identity = definition.identity();

        let mut registry = self.registry.write();
        if self.settings.strict_duplicate_names {
            registry.check_duplicate_class_name(&definition).map_err(|e| {
                error!("类名冲突: {}", e);
                e
            })?;
        }
        registry.register_definition(identity.uuid.clone(), definition);
        registry
            .identifier_relation_mut()
            .save_class_relation(&identity, namespace.as_deref());

        debug!(
            "注册类定义: {} -> {} (命名空间: {:?})",
            identity.name, identity.uuid, namespace
        );
        Ok(identity.uuid)
    }

    /// 注册函数形态的定义，`declared_id` 是声明时给出的别名
    pub fn register_function(
        &self,
        declared_id: impl Into<ObjectIdentifier>,
        definition: DefinitionRef,
    ) -> ObjectIdentifier {
        let declared_id = declared_id.into();
        let uuid = definition.uuid().clone();

        let mut registry = self.registry.write();
        registry.register_definition(uuid.clone(), definition);
        registry
            .identifier_relation_mut()
            .save_function_relation(&declared_id, &uuid);

        debug!("注册函数定义: {} -> {}", declared_id, uuid);
        uuid
    }

    /// 注册预先构建的实例
    pub fn register_object(&self, identifier: impl Into<ObjectIdentifier>, instance: ObjectInstance) {
        self.registry
            .write()
            .register_object(&identifier.into(), instance);
    }

    /// 解析单个定义的依赖
    pub fn resolve(&self, identifier: &str) -> CoreResult<ResolutionPlan> {
        let registry = self.registry.read();
        DefinitionResolver::new(&*registry).resolve(identifier)
    }

    /// 验证所有定义的依赖和作用域约束
    pub fn validate(&self) -> CoreResult<()> {
        let registry = self.registry.read();
        info!("开始验证 {} 个定义", registry.identifiers().len());
        DefinitionResolver::new(&*registry).validate_all()?;
        info!("定义验证通过");
        Ok(())
    }

    /// 获取单例，按解析顺序先构建其单例依赖
    pub async fn get_singleton(&self, identifier: &str) -> CoreResult<ObjectInstance> {
        let plan = self.resolve(identifier)?;

        for id in &plan.order {
            let is_singleton = self
                .registry
                .read()
                .get_definition(id.as_str())
                .is_some_and(|definition| definition.is_singleton_scope());
            if !is_singleton {
                if id == &plan.root {
                    return Err(CoreError::common(format!(
                        "{identifier} is not a singleton definition"
                    )));
                }
                continue;
            }
            self.singletons
                .get_or_create(&*self.registry, id.as_str())
                .await?;
        }

        self.registry
            .read()
            .get_object(plan.root.as_str())
            .ok_or_else(|| CoreError::definition_not_found(plan.root.clone()))
    }

    /// 丢弃单个单例，下一次获取时按当前定义重新构建
    pub async fn invalidate(&self, identifier: &str) -> bool {
        self.singletons.invalidate(&*self.registry, identifier).await
    }

    /// 热重载边界：清空定义、实例和单例构建状态
    pub fn reload(&self) {
        info!("重新加载容器");
        self.registry.write().clear_all();
        self.singletons.reset();
    }
}

impl Default for ContainerBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerBootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBootstrapper")
            .field("settings", &self.settings)
            .field("logging_config", &self.logging_config)
            .field("definitions", &self.registry.read().identifiers().len())
            .finish_non_exhaustive()
    }
}
