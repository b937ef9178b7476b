//! 默认标识关系实现

use di_abstractions::IdentifierRelation;
use ioc_common::{ComponentIdentity, ObjectIdentifier};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 基于内存表的标识关系
#[derive(Debug, Default, Clone)]
pub struct DefaultIdentifierRelation {
    store: HashMap<ObjectIdentifier, ObjectIdentifier>,
}

impl DefaultIdentifierRelation {
    /// 创建空的标识关系
    pub fn new() -> Self {
        Self::default()
    }

    /// 别名数量
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn upsert(&mut self, alias: ObjectIdentifier, canonical: &ObjectIdentifier) {
        if let Some(previous) = self.store.insert(alias.clone(), canonical.clone()) {
            if &previous != canonical {
                warn!("别名 {} 从 {} 改为指向 {}", alias, previous, canonical);
            }
        }
    }
}

impl IdentifierRelation for DefaultIdentifierRelation {
    fn save_class_relation(&mut self, identity: &ComponentIdentity, namespace: Option<&str>) {
        let uuid = &identity.uuid;
        self.upsert(uuid.clone(), uuid);
        if uuid.is_empty() {
            return;
        }

        if let Some(alias) = &identity.id {
            self.upsert(alias.clone(), uuid);
        }
        self.upsert(ObjectIdentifier::from(identity.name.as_str()), uuid);
        if let Some(namespace) = namespace {
            self.upsert(ObjectIdentifier::namespaced(namespace, &identity.name), uuid);
        }
        debug!("保存类标识关系: {} -> {}", identity.name, uuid);
    }

    fn save_function_relation(&mut self, id: &ObjectIdentifier, uuid: &ObjectIdentifier) {
        self.upsert(uuid.clone(), uuid);
        self.upsert(id.clone(), uuid);
        debug!("保存函数标识关系: {} -> {}", id, uuid);
    }

    fn has_relation(&self, id: &str) -> bool {
        self.store.contains_key(id)
    }

    fn get_relation(&self, id: &str) -> Option<ObjectIdentifier> {
        self.store.get(id).cloned()
    }
}
