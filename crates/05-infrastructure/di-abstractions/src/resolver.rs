//! 依赖解析器抽象接口
//!
//! 注册表本身不关心作用域，作用域约束由位于其上的解析引擎执行。

use crate::definition::ObjectDefinition;
use ioc_common::{CoreError, CoreResult, ObjectIdentifier};
use tracing::debug;

/// 依赖解析器 trait
///
/// 只解析定义，不创建实例
pub trait DependencyResolver: Send + Sync {
    /// 解析指定标识及其全部依赖，返回按构建顺序排列的规范标识
    fn resolve(&self, identifier: &str) -> CoreResult<ResolutionPlan>;

    /// 是否可以解析指定标识
    fn can_resolve(&self, identifier: &str) -> bool {
        self.resolve(identifier).is_ok()
    }

    /// 解析所有已知定义，返回遇到的第一个错误
    fn validate_all(&self) -> CoreResult<()>;
}

/// 解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// 被请求的规范标识
    pub root: ObjectIdentifier,
    /// 构建顺序：依赖在前，每个标识只出现一次，最后一个是 `root`
    pub order: Vec<ObjectIdentifier>,
}

impl ResolutionPlan {
    /// 是否包含指定标识
    pub fn contains(&self, identifier: &str) -> bool {
        self.order.iter().any(|id| id == identifier)
    }
}

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<ObjectIdentifier>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定选项创建解析上下文
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加标识到解析链
    pub fn push(&mut self, identifier: ObjectIdentifier) -> CoreResult<()> {
        if self.resolution_chain.contains(&identifier) {
            let chain = self
                .resolution_chain
                .iter()
                .map(ObjectIdentifier::as_str)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(CoreError::common(format!(
                "circular dependency detected: {chain} -> {identifier}"
            )));
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(CoreError::common(format!(
                "resolution of {identifier} exceeded max depth {}",
                self.options.max_depth
            )));
        }
        self.resolution_chain.push(identifier);
        Ok(())
    }

    /// 从解析链中移除最后一个标识
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// 检查作用域兼容性
///
/// 单例不能隐式持有请求作用域对象，除非被依赖方设置了 `allow_downgrade`。
pub fn check_scope_compatibility(
    dependent: &dyn ObjectDefinition,
    dependency: &dyn ObjectDefinition,
) -> CoreResult<()> {
    if dependent.is_singleton_scope()
        && dependency.is_request_scope()
        && !dependency.allow_downgrade()
    {
        return Err(CoreError::singleton_inject_request(
            dependent.name(),
            dependency.name(),
        ));
    }
    if dependent.is_singleton_scope() && dependency.is_request_scope() {
        debug!(
            "{} 以降级方式注入请求作用域对象 {}",
            dependent.name(),
            dependency.name()
        );
    }
    Ok(())
}
