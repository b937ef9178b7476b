//! 对象定义注册表抽象接口

use crate::creator::ObjectInstance;
use crate::definition::DefinitionRef;
use crate::relation::IdentifierRelation;
use ioc_common::ObjectIdentifier;

/// 对象定义注册表 trait
///
/// 定义存储与实例存储是两个互不相交的逻辑存储。除 `register_object`、
/// `remove_object` 和 `remove_definition` 外，所有按标识的查询都先经过当前安装的标识关系解析，
/// 解析不到时把输入当作规范标识。
pub trait ObjectDefinitionRegistry: Send + Sync {
    /// 当前安装的标识关系
    fn identifier_relation(&self) -> &dyn IdentifierRelation;

    /// 可变的标识关系，扫描层通过它保存别名
    fn identifier_relation_mut(&mut self) -> &mut dyn IdentifierRelation;

    /// 替换标识关系实现
    fn set_identifier_relation(&mut self, relation: Box<dyn IdentifierRelation>);

    /// 所有已知定义的标识，不包含实例存储的键
    fn identifiers(&self) -> Vec<ObjectIdentifier>;

    /// 两个存储中的键总数（包含实例）
    fn count(&self) -> usize;

    /// 按注册顺序返回单例作用域的标识
    fn get_singleton_definition_ids(&self) -> Vec<ObjectIdentifier>;

    /// 按存储顺序返回所有 `name` 相同的定义
    fn get_definition_by_name(&self, name: &str) -> Vec<DefinitionRef>;

    /// 注册定义，不会写入标识关系
    fn register_definition(&mut self, identifier: ObjectIdentifier, definition: DefinitionRef);

    /// 获取定义
    fn get_definition(&self, identifier: &str) -> Option<DefinitionRef>;

    /// 按字面标识删除定义，不经过标识关系解析
    fn remove_definition(&mut self, identifier: &str);

    /// 是否存在定义
    fn has_definition(&self, identifier: &str) -> bool;

    /// 按字面标识注册单例实例
    fn register_object(&mut self, identifier: &ObjectIdentifier, instance: ObjectInstance);

    /// 获取单例实例
    fn get_object(&self, identifier: &str) -> Option<ObjectInstance>;

    /// 是否存在单例实例
    fn has_object(&self, identifier: &str) -> bool;

    /// 按字面标识删除单例实例，返回是否存在过
    fn remove_object(&mut self, identifier: &str) -> bool;

    /// 清空两个存储和单例标识序列
    fn clear_all(&mut self);

    /// 把任意别名解析为规范标识，解析不到时原样返回
    fn resolve_identifier(&self, identifier: &str) -> ObjectIdentifier {
        self.identifier_relation()
            .get_relation(identifier)
            .unwrap_or_else(|| ObjectIdentifier::from(identifier))
    }
}
