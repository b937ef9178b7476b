//! 变体值定义
//!
//! 属性、处理器元数据和属性包中保存的值都使用 [`PropertyValue`]：
//! 普通数据、对其他对象的引用，或者不透明的运行时数据块。

use crate::identifier::ObjectIdentifier;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 不透明数据块
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    /// 包装任意值
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// 原始类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 向下转型
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// 共享的底层数据
    pub fn as_shared(&self) -> Arc<dyn Any + Send + Sync> {
        self.inner.clone()
    }

    /// 是否指向同一数据块
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueValue")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// 属性值
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// 普通数据（基本类型或结构化数据）
    Value(serde_json::Value),
    /// 对另一个对象定义的引用
    Reference(ObjectIdentifier),
    /// 不透明数据块
    Opaque(OpaqueValue),
}

impl PropertyValue {
    /// 创建引用
    pub fn reference(id: impl Into<ObjectIdentifier>) -> Self {
        Self::Reference(id.into())
    }

    /// 创建不透明数据块
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(OpaqueValue::new(value))
    }

    /// 若为引用则返回被引用的标识
    pub fn as_reference(&self) -> Option<&ObjectIdentifier> {
        match self {
            Self::Reference(id) => Some(id),
            _ => None,
        }
    }

    /// 若为普通数据则返回
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// 是否为引用
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Reference(a), Self::Reference(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Value(serde_json::Value::String(value.to_string()))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Value(serde_json::Value::String(value))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Value(serde_json::Value::Bool(value))
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Value(serde_json::Value::from(value))
    }
}

/// 属性配置
///
/// 描述目标对象的构造器/setter 注入值，保持插入顺序。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: IndexMap<ObjectIdentifier, PropertyValue>,
}

impl Properties {
    /// 创建空属性集
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取属性，不存在时返回默认值
    pub fn get_property(
        &self,
        key: &str,
        default_value: Option<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.entries.get(key).cloned().or(default_value)
    }

    /// 获取属性引用
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    /// 设置属性，返回被覆盖的旧值
    pub fn set_property(
        &mut self,
        key: impl Into<ObjectIdentifier>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// 按插入顺序返回所有属性键
    pub fn property_keys(&self) -> Vec<ObjectIdentifier> {
        self.entries.keys().cloned().collect()
    }

    /// 遍历属性
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectIdentifier, &PropertyValue)> {
        self.entries.iter()
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 自定义装饰器附加的元数据
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerProp {
    /// 被装饰的属性名
    pub property_name: String,
    /// 装饰器标识
    pub key: String,
    /// 装饰器元数据
    pub metadata: PropertyValue,
}

impl HandlerProp {
    /// 创建新的处理器元数据
    pub fn new(
        property_name: impl Into<String>,
        key: impl Into<String>,
        metadata: impl Into<PropertyValue>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            key: key.into(),
            metadata: metadata.into(),
        }
    }
}

/// 定义属性包
///
/// 框架内部附加在单个定义上的注解，与 [`Properties`] 无关。
/// 定义通过 `Arc` 共享，因此使用内部可变性。
#[derive(Debug, Default)]
pub struct AttributeBag {
    entries: RwLock<IndexMap<ObjectIdentifier, PropertyValue>>,
}

impl AttributeBag {
    /// 创建空属性包
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取属性
    pub fn get(&self, key: &str) -> Option<PropertyValue> {
        self.entries.read().get(key).cloned()
    }

    /// 写入属性
    pub fn set(&self, key: impl Into<ObjectIdentifier>, value: impl Into<PropertyValue>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// 是否存在属性
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
