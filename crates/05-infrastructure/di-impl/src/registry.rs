//! 对象定义注册表实现
//!
//! 定义和单例实例放在同一个有序表中，实例的键带有私有前缀，
//! 两类条目由 [`StoreEntry`] 区分，永远不会把实例当作定义返回。

use crate::relation::DefaultIdentifierRelation;
use di_abstractions::{DefinitionRef, IdentifierRelation, ObjectDefinitionRegistry, ObjectInstance};
use indexmap::IndexMap;
use ioc_common::{CoreError, CoreResult, ObjectIdentifier, RegistrySettings};
use tracing::{debug, info, warn};

/// 实例存储键的私有前缀
const INSTANCE_KEY_PREFIX: &str = "_id_default_";

fn instance_key(identifier: &str) -> String {
    format!("{INSTANCE_KEY_PREFIX}{identifier}")
}

#[derive(Debug, Clone)]
enum StoreEntry {
    Definition(DefinitionRef),
    Object(ObjectInstance),
}

/// 对象定义注册表实现
#[derive(Debug)]
pub struct ObjectDefinitionRegistryImpl {
    store: IndexMap<String, StoreEntry>,
    singleton_ids: Vec<ObjectIdentifier>,
    identifier_relation: Box<dyn IdentifierRelation>,
    dedupe_singleton_ids: bool,
}

impl ObjectDefinitionRegistryImpl {
    /// 使用默认标识关系创建注册表
    pub fn new() -> Self {
        Self::with_identifier_relation(Box::new(DefaultIdentifierRelation::new()))
    }

    /// 使用指定标识关系创建注册表
    pub fn with_identifier_relation(relation: Box<dyn IdentifierRelation>) -> Self {
        Self {
            store: IndexMap::new(),
            singleton_ids: Vec::new(),
            identifier_relation: relation,
            dedupe_singleton_ids: false,
        }
    }

    /// 按配置创建注册表
    pub fn from_settings(settings: &RegistrySettings) -> Self {
        let mut registry = Self::new();
        registry.dedupe_singleton_ids = settings.dedupe_singleton_ids;
        registry
    }

    /// 重复注册单例时是否去重
    pub fn set_dedupe_singleton_ids(&mut self, enabled: bool) {
        self.dedupe_singleton_ids = enabled;
    }

    /// 检查类名冲突
    ///
    /// 已注册的同名定义来自不同源文件时返回类名重复错误。
    /// 源文件相同或未知时视为同一个类的重新注册。
    pub fn check_duplicate_class_name(&self, definition: &DefinitionRef) -> CoreResult<()> {
        let Some(src_path) = definition.src_path() else {
            return Ok(());
        };
        for existing in self.get_definition_by_name(definition.name()) {
            if existing.uuid() == definition.uuid() {
                continue;
            }
            if let Some(existing_path) = existing.src_path() {
                if existing_path != src_path {
                    return Err(CoreError::duplicate_class_name(
                        definition.name(),
                        existing_path,
                        src_path,
                    ));
                }
            }
        }
        Ok(())
    }

    fn definitions(&self) -> impl Iterator<Item = (&String, &DefinitionRef)> + '_ {
        self.store.iter().filter_map(|(key, entry)| match entry {
            StoreEntry::Definition(definition) => Some((key, definition)),
            StoreEntry::Object(_) => None,
        })
    }
}

impl Default for ObjectDefinitionRegistryImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectDefinitionRegistry for ObjectDefinitionRegistryImpl {
    fn identifier_relation(&self) -> &dyn IdentifierRelation {
        self.identifier_relation.as_ref()
    }

    fn identifier_relation_mut(&mut self) -> &mut dyn IdentifierRelation {
        self.identifier_relation.as_mut()
    }

    fn set_identifier_relation(&mut self, relation: Box<dyn IdentifierRelation>) {
        debug!("替换标识关系实现: {:?}", relation);
        self.identifier_relation = relation;
    }

    fn identifiers(&self) -> Vec<ObjectIdentifier> {
        self.definitions()
            .map(|(key, _)| ObjectIdentifier::from(key))
            .collect()
    }

    fn count(&self) -> usize {
        self.store.len()
    }

    fn get_singleton_definition_ids(&self) -> Vec<ObjectIdentifier> {
        self.singleton_ids.clone()
    }

    fn get_definition_by_name(&self, name: &str) -> Vec<DefinitionRef> {
        self.definitions()
            .filter(|(_, definition)| definition.name() == name)
            .map(|(_, definition)| definition.clone())
            .collect()
    }

    fn register_definition(&mut self, identifier: ObjectIdentifier, definition: DefinitionRef) {
        if definition.is_singleton_scope() {
            if self.singleton_ids.contains(&identifier) {
                if self.dedupe_singleton_ids {
                    debug!("单例标识已存在，跳过追加: {}", identifier);
                } else {
                    warn!("单例标识被重复注册: {}", identifier);
                    self.singleton_ids.push(identifier.clone());
                }
            } else {
                self.singleton_ids.push(identifier.clone());
            }
        }
        debug!(
            "注册定义: {} ({}, {})",
            identifier,
            definition.name(),
            definition.scope()
        );
        self.store
            .insert(identifier.into_inner(), StoreEntry::Definition(definition));
    }

    fn get_definition(&self, identifier: &str) -> Option<DefinitionRef> {
        let canonical = self.resolve_identifier(identifier);
        match self.store.get(canonical.as_str()) {
            Some(StoreEntry::Definition(definition)) => Some(definition.clone()),
            _ => None,
        }
    }

    fn remove_definition(&mut self, identifier: &str) {
        if let Some(StoreEntry::Definition(_)) = self.store.get(identifier) {
            self.store.shift_remove(identifier);
            debug!("删除定义: {}", identifier);
        }
    }

    fn has_definition(&self, identifier: &str) -> bool {
        let canonical = self.resolve_identifier(identifier);
        matches!(
            self.store.get(canonical.as_str()),
            Some(StoreEntry::Definition(_))
        )
    }

    fn register_object(&mut self, identifier: &ObjectIdentifier, instance: ObjectInstance) {
        debug!("注册单例实例: {}", identifier);
        self.store
            .insert(instance_key(identifier.as_str()), StoreEntry::Object(instance));
    }

    fn get_object(&self, identifier: &str) -> Option<ObjectInstance> {
        let canonical = self.resolve_identifier(identifier);
        match self.store.get(&instance_key(canonical.as_str())) {
            Some(StoreEntry::Object(instance)) => Some(instance.clone()),
            _ => None,
        }
    }

    fn has_object(&self, identifier: &str) -> bool {
        let canonical = self.resolve_identifier(identifier);
        matches!(
            self.store.get(&instance_key(canonical.as_str())),
            Some(StoreEntry::Object(_))
        )
    }

    fn remove_object(&mut self, identifier: &str) -> bool {
        let key = instance_key(identifier);
        if let Some(StoreEntry::Object(_)) = self.store.get(&key) {
            self.store.shift_remove(&key);
            debug!("删除单例实例: {}", identifier);
            return true;
        }
        false
    }

    fn clear_all(&mut self) {
        info!(
            "清空注册表: {} 个条目, {} 个单例标识",
            self.store.len(),
            self.singleton_ids.len()
        );
        self.singleton_ids.clear();
        self.store.clear();
    }
}
