//! 对象标识定义

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 命名空间与类名之间的分隔符
pub const NAMESPACE_SEPARATOR: char = ':';

/// 对象标识
///
/// 对注册表而言是不透明的字符串。空字符串也是合法的标识，
/// 与"不存在"是两回事。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectIdentifier(String);

impl ObjectIdentifier {
    /// 创建新的标识
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 构造 `namespace:ClassName` 形式的命名空间别名
    pub fn namespaced(namespace: &str, class_name: &str) -> Self {
        Self(format!("{namespace}{NAMESPACE_SEPARATOR}{class_name}"))
    }

    /// 拆分命名空间别名，非命名空间形式返回 `None`
    pub fn split_namespace(&self) -> Option<(&str, &str)> {
        self.0.split_once(NAMESPACE_SEPARATOR)
    }

    /// 字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为空标识
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 取出内部字符串
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectIdentifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ObjectIdentifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ObjectIdentifier {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&ObjectIdentifier> for ObjectIdentifier {
    fn from(value: &ObjectIdentifier) -> Self {
        value.clone()
    }
}

impl Borrow<str> for ObjectIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ObjectIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ObjectIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// 类形态定义的身份信息
///
/// 扫描层为每个类生成的唯一标识、用户声明的别名以及类名，
/// 是 `save_class_relation` 的输入。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentIdentity {
    /// 扫描层生成的唯一标识（规范标识）
    pub uuid: ObjectIdentifier,
    /// 用户声明的别名
    pub id: Option<ObjectIdentifier>,
    /// 类名
    pub name: String,
}

impl ComponentIdentity {
    /// 创建新的身份信息
    pub fn new(uuid: impl Into<ObjectIdentifier>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            id: None,
            name: name.into(),
        }
    }

    /// 设置别名
    pub fn with_id(mut self, id: impl Into<ObjectIdentifier>) -> Self {
        self.id = Some(id.into());
        self
    }
}
