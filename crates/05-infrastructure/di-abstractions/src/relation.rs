//! 标识关系抽象接口
//!
//! 一个对象可以通过多个名字被引用：生成的唯一标识、用户别名、类名、
//! 带命名空间的类名、函数标识。标识关系把这些别名映射到唯一的规范标识。

use ioc_common::{ComponentIdentity, ObjectIdentifier};
use std::fmt::Debug;

/// 标识关系 trait
///
/// 所有写入都是覆盖式的，后注册的别名覆盖先注册的映射。
pub trait IdentifierRelation: Send + Sync + Debug {
    /// 保存类形态定义的别名：规范标识、用户别名、类名，以及可选的 `namespace:ClassName`
    fn save_class_relation(&mut self, identity: &ComponentIdentity, namespace: Option<&str>);

    /// 保存工厂函数形态定义的别名
    fn save_function_relation(&mut self, id: &ObjectIdentifier, uuid: &ObjectIdentifier);

    /// 别名表中是否存在该键（包含规范标识到自身的映射）
    fn has_relation(&self, id: &str) -> bool;

    /// 返回别名对应的规范标识，未知别名返回 `None`
    fn get_relation(&self, id: &str) -> Option<ObjectIdentifier>;
}
