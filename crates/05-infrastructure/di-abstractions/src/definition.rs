//! 对象定义抽象接口
//!
//! 对象定义是构建和管理某个对象的声明式描述，而不是对象本身。
//! 所有谓词都只依赖定义自身的字段。

use crate::creator::{ObjectCreator, ObjectInstance};
use ioc_common::{
    ComponentIdentity, CreateFrom, HandlerProp, ObjectIdentifier, Properties, PropertyValue,
    ScopeKind,
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// 共享的对象定义
pub type DefinitionRef = Arc<dyn ObjectDefinition>;

/// 绑定钩子，对象创建完成、写入实例存储之前调用
pub type BindHook = Arc<dyn Fn(&ObjectInstance, &dyn ObjectDefinition) + Send + Sync>;

/// 对象定义 trait
pub trait ObjectDefinition: Send + Sync + Debug {
    /// 扫描层生成的唯一标识
    fn uuid(&self) -> &ObjectIdentifier;

    /// 用户声明的别名
    fn id(&self) -> Option<&ObjectIdentifier>;

    /// 类名或函数名
    fn name(&self) -> &str;

    /// 命名空间
    fn namespace(&self) -> Option<&str>;

    /// 创建器
    fn creator(&self) -> Option<&Arc<dyn ObjectCreator>>;

    /// 构造方法名
    fn construct_method(&self) -> Option<&str>;

    /// 初始化钩子名
    fn init_method(&self) -> Option<&str>;

    /// 销毁钩子名
    fn destroy_method(&self) -> Option<&str>;

    /// 源文件路径
    fn src_path(&self) -> Option<&str>;

    /// 导出名
    fn export(&self) -> Option<&str>;

    /// 路径形式的属性值映射
    fn path(&self) -> &HashMap<String, String>;

    /// 必须先于本定义存在的标识，保持声明顺序
    fn depends_on(&self) -> &[ObjectIdentifier];

    /// 按位置传入的构造参数
    fn constructor_args(&self) -> &[PropertyValue];

    /// 目标对象的注入属性
    fn properties(&self) -> &Properties;

    /// 作用域
    fn scope(&self) -> ScopeKind;

    /// 是否允许被注入到单例中（仅对请求作用域有意义）
    fn allow_downgrade(&self) -> bool;

    /// 其他装饰器附加的元数据
    fn handler_props(&self) -> &[HandlerProp];

    /// 定义来源
    fn create_from(&self) -> CreateFrom;

    /// 是否需要异步创建
    fn is_async(&self) -> bool;

    /// 读取属性包
    fn get_attr(&self, key: &str) -> Option<PropertyValue>;

    /// 属性包中是否存在该键
    fn has_attr(&self, key: &str) -> bool;

    /// 写入属性包
    fn set_attr(&self, key: ObjectIdentifier, value: PropertyValue);

    /// 绑定钩子
    fn bind_hook(&self) -> Option<&BindHook> {
        None
    }

    /// 是否单例作用域
    fn is_singleton_scope(&self) -> bool {
        self.scope() == ScopeKind::Singleton
    }

    /// 是否请求作用域
    fn is_request_scope(&self) -> bool {
        self.scope() == ScopeKind::Request
    }

    /// 是否声明了前置依赖
    fn has_depends_on(&self) -> bool {
        !self.depends_on().is_empty()
    }

    /// 是否有构造参数
    fn has_constructor_args(&self) -> bool {
        !self.constructor_args().is_empty()
    }

    /// 类形态的身份信息
    fn identity(&self) -> ComponentIdentity {
        ComponentIdentity {
            uuid: self.uuid().clone(),
            id: self.id().cloned(),
            name: self.name().to_string(),
        }
    }

    /// 本定义引用的所有标识：`depends_on`、构造参数引用、属性引用，去重后保持首次出现的顺序
    fn references(&self) -> Vec<ObjectIdentifier> {
        let mut refs: Vec<ObjectIdentifier> = Vec::new();
        let candidates = self
            .depends_on()
            .iter()
            .chain(
                self.constructor_args()
                    .iter()
                    .filter_map(PropertyValue::as_reference),
            )
            .chain(
                self.properties()
                    .iter()
                    .filter_map(|(_, value)| value.as_reference()),
            );
        for id in candidates {
            if !refs.contains(id) {
                refs.push(id.clone());
            }
        }
        refs
    }
}
