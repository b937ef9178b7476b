//! # IoC Common
//!
//! 这个 crate 提供了 IoC 容器身份解析与对象定义注册表共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`ObjectIdentifier`] - 不透明的对象标识
//! - [`ComponentIdentity`] - 类形态定义的身份信息（uuid / 别名 / 类名）
//! - [`ScopeKind`] - 作用域分类
//! - [`PropertyValue`] - 带标签的变体值
//! - [`CoreError`] - 封闭的错误分类，每种错误携带稳定的数字错误码
//! - [`RegistrySettings`] - 注册表配置
//!
//! ## 设计原则
//!
//! - 标识是不透明字符串，命名空间别名使用 `:` 分隔
//! - 可扩展元数据使用显式的变体类型，而不是无类型的 any
//! - 错误按值判别，而不是按类型继承判别

pub mod configuration;
pub mod errors;
pub mod identifier;
pub mod scope;
pub mod value;

pub use configuration::*;
pub use errors::*;
pub use identifier::*;
pub use scope::*;
pub use value::*;
