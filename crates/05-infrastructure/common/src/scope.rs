//! 对象作用域分类

use serde::{Deserialize, Serialize};
use std::fmt;

/// 对象作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// 单例 - 容器生命周期内只有一个实例
    #[default]
    Singleton,
    /// 请求 - 每个逻辑请求一个实例
    Request,
    /// 原型 - 每次解析都创建新实例
    Prototype,
}

impl ScopeKind {
    /// 作用域名称
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Request => "request",
            Self::Prototype => "prototype",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 作用域选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeOptions {
    /// 允许请求作用域对象被注入到单例中
    #[serde(default)]
    pub allow_downgrade: bool,
}

/// 定义来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateFrom {
    /// 框架内置
    Framework,
    /// 源文件扫描
    #[default]
    File,
    /// 预构建模块
    Module,
}
