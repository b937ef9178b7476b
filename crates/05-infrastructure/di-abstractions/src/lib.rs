//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义对象定义、标识关系和定义注册表的核心接口。
//!
//! ## 核心接口
//!
//! - [`ObjectDefinition`] - 对象定义接口
//! - [`IdentifierRelation`] - 别名到规范标识的映射
//! - [`ObjectDefinitionRegistry`] - 对象定义注册表接口
//! - [`ObjectCreator`] - 对象创建器接口
//! - [`DependencyResolver`] - 依赖解析器接口

pub mod creator;
pub mod definition;
pub mod registry;
pub mod relation;
pub mod resolver;

pub use creator::*;
pub use definition::*;
pub use registry::*;
pub use relation::*;
pub use resolver::*;
