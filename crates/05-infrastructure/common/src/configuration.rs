//! 注册表配置
//!
//! 使用 `config` crate 叠加配置文件和环境变量（如 `IOC_DEDUPE_SINGLETON_IDS`、
//! `IOC_LOGGING__LEVEL`），再绑定到 [`RegistrySettings`]。任何格式错误都以 [`CoreError::InvalidConfig`] 返回。

use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "IOC";

/// 可以覆盖配置的环境变量，其余 `IOC_*` 变量被忽略
const ENV_KEYS: &[&str] = &[
    "IOC_STRICT_DUPLICATE_NAMES",
    "IOC_DEDUPE_SINGLETON_IDS",
    "IOC_DEFAULT_NAMESPACE",
    "IOC_LOGGING__LEVEL",
    "IOC_LOGGING__JSON",
];

fn environment<I>(vars: I) -> config::Environment
where
    I: IntoIterator<Item = (String, String)>,
{
    let known: config::Map<String, String> = vars
        .into_iter()
        .filter(|(key, _)| ENV_KEYS.contains(&key.to_ascii_uppercase().as_str()))
        .collect();
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .source(Some(known))
}

/// 注册表配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// 不同源文件中出现相同类名时拒绝注册
    pub strict_duplicate_names: bool,
    /// 重复注册单例时不再追加单例标识
    pub dedupe_singleton_ids: bool,
    /// 调用方未指定命名空间时使用的默认命名空间
    pub default_namespace: Option<String>,
    /// 日志配置
    pub logging: LoggingSettings,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            strict_duplicate_names: true,
            dedupe_singleton_ids: false,
            default_namespace: None,
            logging: LoggingSettings::default(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// 过滤表达式，如 `info` 或 `di_impl=debug`
    pub level: String,
    /// 是否输出 JSON 格式
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl RegistrySettings {
    /// 从配置文件加载，文件格式由扩展名决定，环境变量覆盖文件中的值
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::from_file_with_vars(path, std::env::vars())
    }

    fn from_file_with_vars<I>(path: impl AsRef<Path>, vars: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let path = path.as_ref();
        debug!("加载注册表配置: {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(environment(vars))
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                CoreError::invalid_config(e.to_string())
            })?;

        Self::bind(settings)
    }

    /// 从字符串加载
    pub fn from_content(content: &str, format: config::FileFormat) -> CoreResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, format))
            .build()
            .map_err(|e| CoreError::invalid_config(e.to_string()))?;

        Self::bind(settings)
    }

    fn bind(settings: config::Config) -> CoreResult<Self> {
        let result: Self = settings.try_deserialize().map_err(|e| {
            error!("配置绑定失败: {}", e);
            CoreError::invalid_config(e.to_string())
        })?;
        result.validate()?;
        Ok(result)
    }

    /// 验证配置
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(namespace) = &self.default_namespace {
            if namespace.trim().is_empty() {
                return Err(CoreError::invalid_config("default_namespace must not be empty"));
            }
            if namespace.contains(crate::identifier::NAMESPACE_SEPARATOR) {
                return Err(CoreError::invalid_config(format!(
                    "default_namespace \"{namespace}\" must not contain ':'"
                )));
            }
        }
        if self.logging.level.trim().is_empty() {
            return Err(CoreError::invalid_config("logging.level must not be empty"));
        }
        Ok(())
    }
}
