//! # 依赖注入具体实现
//!
//! 提供标识关系、对象定义注册表、对象定义构建器、定义级依赖解析器和单例构建守卫的实现

pub mod definition;
pub mod registry;
pub mod relation;
pub mod resolver;
pub mod singleton;

pub use definition::*;
pub use registry::*;
pub use relation::*;
pub use resolver::*;
pub use singleton::*;
