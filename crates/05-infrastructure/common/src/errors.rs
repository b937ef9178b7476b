//! 错误类型定义
//!
//! 框架错误是一个封闭的分类，每种错误都携带稳定的数字错误码，
//! 调用方通过 [`CoreError::kind`] 按值判别，而不是匹配错误消息。

use crate::identifier::ObjectIdentifier;
use thiserror::Error;

/// 框架错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameworkErrorCode {
    /// 未分类错误
    Unknown,
    /// 通用错误
    Common,
    /// 缺少解析器
    MissingResolver,
    /// 依赖版本不一致
    InconsistentVersion,
    /// 缺少导入的命名空间
    MissingImports,
    /// 找不到定义
    DefinitionNotFound,
    /// 单例注入请求作用域对象
    SingletonInjectRequest,
    /// 类名重复
    DuplicateClassName,
    /// 配置无效
    InvalidConfig,
    /// 方法误用
    UseWrongMethod,
}

impl FrameworkErrorCode {
    /// 数字错误码
    pub fn code(self) -> u32 {
        match self {
            Self::Unknown => 99999,
            Self::Common => 10000,
            Self::MissingResolver => 10001,
            Self::InconsistentVersion => 10002,
            Self::MissingImports => 10003,
            Self::DefinitionNotFound => 10004,
            // 历史值，跨进程诊断依赖它，不能改成 10005
            Self::SingletonInjectRequest => 1005,
            Self::DuplicateClassName => 10006,
            Self::InvalidConfig => 10007,
            Self::UseWrongMethod => 10008,
        }
    }

    /// 带命名空间的错误码名称，如 `core.DEFINITION_NOT_FOUND`
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "core.UNKNOWN",
            Self::Common => "core.COMMON",
            Self::MissingResolver => "core.MISSING_RESOLVER",
            Self::InconsistentVersion => "core.INCONSISTENT_VERSION",
            Self::MissingImports => "core.MISSING_IMPORTS",
            Self::DefinitionNotFound => "core.DEFINITION_NOT_FOUND",
            Self::SingletonInjectRequest => "core.SINGLETON_INJECT_REQUEST",
            Self::DuplicateClassName => "core.DUPLICATE_CLASS_NAME",
            Self::InvalidConfig => "core.INVALID_CONFIG",
            Self::UseWrongMethod => "core.USE_WRONG_METHOD",
        }
    }
}

/// 框架核心错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// 配置无效
    #[error("Invalid config file \n{message}")]
    InvalidConfig {
        /// 错误详情
        message: String,
    },

    /// 方法误用
    #[error("{}", use_wrong_method_text(.wrong_method, .replaced_method, .describe_key.as_deref()))]
    UseWrongMethod {
        /// 被误用的方法
        wrong_method: String,
        /// 应改用的方法
        replaced_method: String,
        /// 出错的对象标识
        describe_key: Option<String>,
    },

    /// 通用错误
    #[error("{message}")]
    Common {
        /// 错误消息
        message: String,
    },

    /// 缺少解析器
    #[error("{resolver_type} resolver is not exists!")]
    ResolverMissing {
        /// 解析器类型
        resolver_type: String,
    },

    /// 缺少导入
    #[error("\"{origin_name}\" can't inject and maybe forgot add \"{{imports: [***]}}\" in @Configuration.")]
    MissingImport {
        /// 无法注入的标识
        origin_name: String,
    },

    /// 依赖版本不一致
    #[error("We find a latest dependency package installed, please remove the lock file and update all dependencies first.")]
    InconsistentVersion,

    /// 找不到定义
    #[error("{}", definition_not_found_text(.identifier, .class_name.as_deref()))]
    DefinitionNotFound {
        /// 找不到的标识
        identifier: ObjectIdentifier,
        /// 发起请求的类名
        class_name: Option<String>,
    },

    /// 类名重复
    #[error("\"{class_name}\" duplicated between \"{exist_path}\" and \"{exist_path_other}\"")]
    DuplicateClassName {
        /// 重复的类名
        class_name: String,
        /// 已注册定义的源文件
        exist_path: String,
        /// 新定义的源文件
        exist_path_other: String,
    },

    /// 单例注入请求作用域对象
    #[error("{singleton_name} with singleton scope can't implicitly inject {request_name} with request scope directly, please set allow_downgrade on {request_name} or use request_context.get_async({request_name}).")]
    SingletonInjectRequest {
        /// 单例定义名
        singleton_name: String,
        /// 请求作用域定义名
        request_name: String,
    },

    /// 未分类错误
    #[error("{message}")]
    Unknown {
        /// 错误消息
        message: String,
    },
}

fn use_wrong_method_text(wrong: &str, replaced: &str, describe_key: Option<&str>) -> String {
    match describe_key {
        Some(key) => format!("{key} not valid by {wrong}, Use {replaced} instead!"),
        None => format!("You should not invoked by {wrong}, Use {replaced} instead!"),
    }
}

fn definition_not_found_text(identifier: &ObjectIdentifier, class_name: Option<&str>) -> String {
    match class_name {
        Some(class_name) => {
            format!("{identifier} in class {class_name} is not valid in current context")
        }
        None => format!("{identifier} is not valid in current context"),
    }
}

impl CoreError {
    /// 创建配置错误
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// 创建方法误用错误
    pub fn use_wrong_method(
        wrong_method: impl Into<String>,
        replaced_method: impl Into<String>,
        describe_key: Option<String>,
    ) -> Self {
        Self::UseWrongMethod {
            wrong_method: wrong_method.into(),
            replaced_method: replaced_method.into(),
            describe_key,
        }
    }

    /// 创建通用错误
    pub fn common(message: impl Into<String>) -> Self {
        Self::Common {
            message: message.into(),
        }
    }

    /// 创建解析器缺失错误
    pub fn resolver_missing(resolver_type: impl Into<String>) -> Self {
        Self::ResolverMissing {
            resolver_type: resolver_type.into(),
        }
    }

    /// 创建缺少导入错误
    pub fn missing_import(origin_name: impl Into<String>) -> Self {
        Self::MissingImport {
            origin_name: origin_name.into(),
        }
    }

    /// 创建定义不存在错误
    pub fn definition_not_found(identifier: impl Into<ObjectIdentifier>) -> Self {
        Self::DefinitionNotFound {
            identifier: identifier.into(),
            class_name: None,
        }
    }

    /// 创建类名重复错误
    pub fn duplicate_class_name(
        class_name: impl Into<String>,
        exist_path: impl Into<String>,
        exist_path_other: impl Into<String>,
    ) -> Self {
        Self::DuplicateClassName {
            class_name: class_name.into(),
            exist_path: exist_path.into(),
            exist_path_other: exist_path_other.into(),
        }
    }

    /// 创建单例注入请求作用域错误
    pub fn singleton_inject_request(
        singleton_name: impl Into<String>,
        request_name: impl Into<String>,
    ) -> Self {
        Self::SingletonInjectRequest {
            singleton_name: singleton_name.into(),
            request_name: request_name.into(),
        }
    }

    /// 错误分类
    pub fn kind(&self) -> FrameworkErrorCode {
        match self {
            Self::InvalidConfig { .. } => FrameworkErrorCode::InvalidConfig,
            Self::UseWrongMethod { .. } => FrameworkErrorCode::UseWrongMethod,
            Self::Common { .. } => FrameworkErrorCode::Common,
            Self::ResolverMissing { .. } => FrameworkErrorCode::MissingResolver,
            Self::MissingImport { .. } => FrameworkErrorCode::MissingImports,
            Self::InconsistentVersion => FrameworkErrorCode::InconsistentVersion,
            Self::DefinitionNotFound { .. } => FrameworkErrorCode::DefinitionNotFound,
            Self::DuplicateClassName { .. } => FrameworkErrorCode::DuplicateClassName,
            Self::SingletonInjectRequest { .. } => FrameworkErrorCode::SingletonInjectRequest,
            Self::Unknown { .. } => FrameworkErrorCode::Unknown,
        }
    }

    /// 数字错误码
    pub fn code(&self) -> u32 {
        self.kind().code()
    }

    /// 是否为定义不存在错误
    pub fn is_definition_not_found(&self) -> bool {
        self.kind() == FrameworkErrorCode::DefinitionNotFound
    }

    /// 在已知请求方类名后补充到定义不存在错误的消息中，其他错误原样返回
    #[must_use]
    pub fn with_requesting_class(self, requesting_class: impl Into<String>) -> Self {
        match self {
            Self::DefinitionNotFound { identifier, .. } => Self::DefinitionNotFound {
                identifier,
                class_name: Some(requesting_class.into()),
            },
            other => other,
        }
    }
}

/// 结果类型别名
pub type CoreResult<T> = Result<T, CoreError>;
