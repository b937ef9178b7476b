//! 日志初始化

use ioc_common::{CoreError, CoreResult, LoggingSettings};
use once_cell::sync::OnceCell;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

static LOGGING_INITIALIZED: OnceCell<()> = OnceCell::new();

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// 过滤表达式，`RUST_LOG` 存在时优先使用环境变量
    pub filter: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            filter: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            filter: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 由注册表配置中的日志段生成
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            filter: settings.level.clone(),
            json_format: settings.json,
            ..Self::default()
        }
    }

    fn env_filter(&self) -> CoreResult<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.filter).map_err(|e| {
            CoreError::invalid_config(format!("invalid log filter \"{}\": {}", self.filter, e))
        })
    }
}

/// 初始化全局日志
///
/// 进程内只生效一次。返回 `true` 表示本次调用安装了订阅者；
/// 已经初始化过或其他代码已设置全局订阅者时返回 `false`。
pub fn init_logging(config: &LoggingConfig) -> CoreResult<bool> {
    if LOGGING_INITIALIZED.get().is_some() {
        return Ok(false);
    }

    let filter = config.env_filter()?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    let installed = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    match installed {
        Ok(()) => {
            let _ = LOGGING_INITIALIZED.set(());
            info!("日志系统初始化完成");
            Ok(true)
        }
        Err(e) => {
            let _ = LOGGING_INITIALIZED.set(());
            debug!("全局日志订阅者已存在: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings = LoggingSettings {
            level: "di_impl=debug".to_string(),
            json: true,
        };
        let config = LoggingConfig::from_settings(&settings);
        assert_eq!(config.filter, "di_impl=debug");
        assert!(config.json_format);
        assert!(config.show_target);
    }

    #[test]
    fn test_presets() {
        assert!(LoggingConfig::production().json_format);
        assert!(!LoggingConfig::development().json_format);
        assert_eq!(LoggingConfig::development().filter, "debug");
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            filter: "di_impl=verbose".to_string(),
            ..LoggingConfig::default()
        };
        let err = config.env_filter().unwrap_err();
        assert_eq!(err.kind(), ioc_common::FrameworkErrorCode::InvalidConfig);
    }
}
