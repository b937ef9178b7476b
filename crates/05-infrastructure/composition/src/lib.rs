//! # 容器组合层
//!
//! 把配置、日志、对象定义注册表、依赖解析器和单例构建守卫组合成可启动的容器。
//!
//! ## 主要功能
//!
//! - **配置加载**: 通过 `config` crate 读取注册表配置文件和 `IOC_` 环境变量
//! - **日志初始化**: 基于 `tracing-subscriber` 的文本或 JSON 输出
//! - **定义注册**: 写入定义并保存类/函数别名
//! - **启动验证**: 在创建任何实例前检查缺失依赖、循环依赖和作用域约束
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use ioc_composition::ContainerBootstrapper;
//! use di_impl::ObjectDefinitionImpl;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bootstrapper = ContainerBootstrapper::with_settings_file("ioc.toml")?;
//!     bootstrapper.init_logging()?;
//!
//!     bootstrapper.register_class(
//!         ObjectDefinitionImpl::builder("uuid-user", "UserService")
//!             .id("userService")
//!             .build(),
//!         Some("core"),
//!     )?;
//!     bootstrapper.validate()?;
//!
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod logging;

pub use bootstrapper::{ContainerBootstrapper, SharedRegistry};
pub use logging::{init_logging, LoggingConfig};

// 重新导出错误类型
pub use ioc_common::{CoreError, CoreResult};
