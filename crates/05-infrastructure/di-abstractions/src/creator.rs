//! 对象创建器抽象接口
//!
//! 定义中的 `creator` 描述如何构建对象：构造函数、工厂函数或预构建模块。
//! 注册表本身从不调用创建器，只由上层的构建引擎使用。

use async_trait::async_trait;
use ioc_common::{CoreError, CoreResult};
use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// 对象实例
pub type ObjectInstance = Arc<dyn Any + Send + Sync>;

/// 对象创建器 trait
#[async_trait]
pub trait ObjectCreator: Send + Sync {
    /// 创建器名称，用于诊断
    fn name(&self) -> &str;

    /// 同步创建对象实例
    fn create(&self, args: Vec<ObjectInstance>) -> CoreResult<ObjectInstance>;

    /// 异步创建对象实例
    async fn create_async(&self, args: Vec<ObjectInstance>) -> CoreResult<ObjectInstance> {
        self.create(args)
    }
}

/// Lambda 创建器包装器
pub struct LambdaCreator<F>
where
    F: Fn(Vec<ObjectInstance>) -> CoreResult<ObjectInstance> + Send + Sync + 'static,
{
    name: String,
    factory_fn: F,
}

impl<F> LambdaCreator<F>
where
    F: Fn(Vec<ObjectInstance>) -> CoreResult<ObjectInstance> + Send + Sync + 'static,
{
    /// 用同步闭包创建
    pub fn new(name: impl Into<String>, factory_fn: F) -> Self {
        Self {
            name: name.into(),
            factory_fn,
        }
    }
}

#[async_trait]
impl<F> ObjectCreator for LambdaCreator<F>
where
    F: Fn(Vec<ObjectInstance>) -> CoreResult<ObjectInstance> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, args: Vec<ObjectInstance>) -> CoreResult<ObjectInstance> {
        (self.factory_fn)(args)
    }
}

/// 异步 Lambda 创建器
///
/// 只能通过 `create_async` 创建，同步调用返回方法误用错误。
pub struct AsyncLambdaCreator<F, Fut>
where
    F: Fn(Vec<ObjectInstance>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CoreResult<ObjectInstance>> + Send + 'static,
{
    name: String,
    factory_fn: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncLambdaCreator<F, Fut>
where
    F: Fn(Vec<ObjectInstance>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CoreResult<ObjectInstance>> + Send + 'static,
{
    /// 用返回 future 的闭包创建
    pub fn new(name: impl Into<String>, factory_fn: F) -> Self {
        Self {
            name: name.into(),
            factory_fn,
            _future: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> ObjectCreator for AsyncLambdaCreator<F, Fut>
where
    F: Fn(Vec<ObjectInstance>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CoreResult<ObjectInstance>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, _args: Vec<ObjectInstance>) -> CoreResult<ObjectInstance> {
        Err(CoreError::use_wrong_method(
            "create",
            "create_async",
            Some(self.name.clone()),
        ))
    }

    async fn create_async(&self, args: Vec<ObjectInstance>) -> CoreResult<ObjectInstance> {
        (self.factory_fn)(args).await
    }
}

/// 预构建模块创建器，每次返回同一个实例
pub struct ModuleCreator {
    name: String,
    module: ObjectInstance,
}

impl ModuleCreator {
    /// 包装已经存在的模块对象
    pub fn new(name: impl Into<String>, module: ObjectInstance) -> Self {
        Self {
            name: name.into(),
            module,
        }
    }
}

#[async_trait]
impl ObjectCreator for ModuleCreator {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, _args: Vec<ObjectInstance>) -> CoreResult<ObjectInstance> {
        Ok(self.module.clone())
    }
}
