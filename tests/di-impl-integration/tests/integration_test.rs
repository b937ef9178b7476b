//! 注册表、标识关系、解析器和启动器的集中集成测试

use anyhow::Result;
use di_abstractions::{
    DependencyResolver, IdentifierRelation, LambdaCreator, ObjectDefinition,
    ObjectDefinitionRegistry, ObjectInstance,
};
use di_impl::{
    DefaultIdentifierRelation, DefinitionResolver, ObjectDefinitionImpl,
    ObjectDefinitionRegistryImpl, SingletonGuard,
};
use ioc_common::{
    ComponentIdentity, CoreError, FrameworkErrorCode, ObjectIdentifier, PropertyValue, ScopeKind,
};
use ioc_composition::ContainerBootstrapper;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn register_class(
    registry: &mut ObjectDefinitionRegistryImpl,
    definition: Arc<ObjectDefinitionImpl>,
    namespace: Option<&str>,
) {
    let identity = definition.identity();
    registry.register_definition(identity.uuid.clone(), definition);
    registry
        .identifier_relation_mut()
        .save_class_relation(&identity, namespace);
}

#[test]
fn test_relation_resolves_every_alias_shape() {
    let mut relation = DefaultIdentifierRelation::new();
    relation.save_class_relation(
        &ComponentIdentity::new("uuid-1", "UserService").with_id("userService"),
        Some("core"),
    );
    relation.save_class_relation(&ComponentIdentity::new("uuid-2", "Logger"), None);

    for alias in ["uuid-1", "userService", "UserService", "core:UserService"] {
        assert_eq!(relation.get_relation(alias).unwrap(), "uuid-1");
    }
    assert_eq!(relation.get_relation("Logger").unwrap(), "uuid-2");
    assert!(relation.has_relation("uuid-2"));

    // 未注册的别名返回 None，而不是空字符串
    assert!(relation.get_relation("nobody").is_none());
    assert!(!relation.has_relation(""));
}

#[test]
fn test_end_to_end_definition_identity() {
    let mut registry = ObjectDefinitionRegistryImpl::new();
    register_class(
        &mut registry,
        ObjectDefinitionImpl::builder("uuid-user", "UserService")
            .id("userService")
            .namespace("core")
            .build(),
        Some("core"),
    );

    let by_alias = registry.get_definition("userService").unwrap();
    let by_ns = registry.get_definition("core:UserService").unwrap();
    let by_uuid = registry.get_definition("uuid-user").unwrap();
    assert!(Arc::ptr_eq(&by_alias, &by_ns));
    assert!(Arc::ptr_eq(&by_alias, &by_uuid));
    assert!(by_alias.is_singleton_scope());
    assert_eq!(
        registry.get_singleton_definition_ids(),
        vec![ObjectIdentifier::from("uuid-user")]
    );
}

#[test]
fn test_singleton_ids_append_per_registration() {
    let mut registry = ObjectDefinitionRegistryImpl::new();
    let definition = ObjectDefinitionImpl::builder("uuid-a", "A").build();
    registry.register_definition("uuid-a".into(), definition.clone());
    assert_eq!(registry.get_singleton_definition_ids().len(), 1);

    registry.register_definition("uuid-a".into(), definition);
    assert_eq!(registry.get_singleton_definition_ids().len(), 2);
    assert_eq!(registry.identifiers().len(), 1);
}

#[test]
fn test_instance_store_is_disjoint() {
    let mut registry = ObjectDefinitionRegistryImpl::new();
    let instance: ObjectInstance = Arc::new(String::from("cached"));
    registry.register_object(&"only-object".into(), instance.clone());

    assert!(registry.has_object("only-object"));
    assert!(!registry.has_definition("only-object"));
    assert!(Arc::ptr_eq(&registry.get_object("only-object").unwrap(), &instance));

    // 标识列表不包含实例，count 包含
    assert!(registry.identifiers().is_empty());
    assert_eq!(registry.count(), 1);
}

#[test]
fn test_remove_and_clear() {
    let mut registry = ObjectDefinitionRegistryImpl::new();
    register_class(
        &mut registry,
        ObjectDefinitionImpl::builder("uuid-a", "A").build(),
        None,
    );
    register_class(
        &mut registry,
        ObjectDefinitionImpl::builder("uuid-b", "B").build(),
        None,
    );
    registry.register_object(&"uuid-b".into(), Arc::new(()));

    registry.remove_definition("uuid-a");
    assert!(!registry.has_definition("uuid-a"));
    assert!(registry.get_definition("A").is_none());

    registry.clear_all();
    assert!(registry.identifiers().is_empty());
    assert!(registry.get_singleton_definition_ids().is_empty());
    assert!(!registry.has_object("uuid-b"));
    assert!(!registry.has_object("B"));
}

#[test]
fn test_duplicate_names_listed_in_registration_order() {
    let mut registry = ObjectDefinitionRegistryImpl::new();
    for (uuid, path) in [("uuid-1", "src/a/foo.rs"), ("uuid-2", "src/b/foo.rs")] {
        registry.register_definition(
            uuid.into(),
            ObjectDefinitionImpl::builder(uuid, "Foo").src_path(path).build(),
        );
    }

    let found = registry.get_definition_by_name("Foo");
    let paths: Vec<_> = found.iter().filter_map(|d| d.src_path()).collect();
    assert_eq!(paths, vec!["src/a/foo.rs", "src/b/foo.rs"]);
}

#[test]
fn test_scope_violation_and_downgrade() -> Result<()> {
    let request_context = |allow_downgrade: bool| {
        ObjectDefinitionImpl::builder("uuid-ctx", "RequestContext")
            .scope(ScopeKind::Request)
            .allow_downgrade(allow_downgrade)
            .build()
    };

    let mut registry = ObjectDefinitionRegistryImpl::new();
    register_class(&mut registry, request_context(false), None);
    register_class(
        &mut registry,
        ObjectDefinitionImpl::builder("uuid-user", "UserService")
            .depends_on("RequestContext")
            .build(),
        None,
    );

    let err = DefinitionResolver::new(&registry)
        .resolve("UserService")
        .unwrap_err();
    assert_eq!(err.kind(), FrameworkErrorCode::SingletonInjectRequest);
    let message = err.to_string();
    assert!(message.contains("UserService"));
    assert!(message.contains("RequestContext"));
    assert!(message.contains("allow_downgrade"));

    register_class(&mut registry, request_context(true), None);
    let plan = DefinitionResolver::new(&registry).resolve("UserService")?;
    assert_eq!(plan.order.len(), 2);
    assert_eq!(plan.root, "uuid-user");
    Ok(())
}

#[test]
fn test_not_found_is_classified_by_value() {
    let registry = ObjectDefinitionRegistryImpl::new();
    let err = DefinitionResolver::new(&registry)
        .resolve("ghost")
        .unwrap_err();

    assert!(err.is_definition_not_found());
    assert_eq!(err.code(), 10004);
    assert!(matches!(err, CoreError::DefinitionNotFound { .. }));
}

#[tokio::test]
async fn test_concurrent_singleton_construction() -> Result<()> {
    let registry = Arc::new(RwLock::new(ObjectDefinitionRegistryImpl::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    register_class(
        &mut registry.write(),
        ObjectDefinitionImpl::builder("uuid-pool", "Pool")
            .creator(Arc::new(LambdaCreator::new("Pool", move |_args: Vec<ObjectInstance>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(String::from("pool")) as ObjectInstance)
            })))
            .build(),
        None,
    );

    let singletons = Arc::new(SingletonGuard::new());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = registry.clone();
        let singletons = singletons.clone();
        handles.push(tokio::spawn(async move {
            singletons.get_or_create(&*registry, "Pool").await
        }));
    }

    let mut instances = Vec::new();
    for handle in handles {
        instances.push(handle.await??);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    Ok(())
}

#[tokio::test]
async fn test_bootstrapper_end_to_end() -> Result<()> {
    let bootstrapper = ContainerBootstrapper::new();
    bootstrapper.register_class(
        ObjectDefinitionImpl::builder("uuid-config", "Config")
            .creator(Arc::new(LambdaCreator::new("Config", |_args: Vec<ObjectInstance>| {
                Ok(Arc::new(serde_json::json!({"port": 8080})) as ObjectInstance)
            })))
            .build(),
        Some("core"),
    )?;
    bootstrapper.register_class(
        ObjectDefinitionImpl::builder("uuid-user", "UserService")
            .id("userService")
            .constructor_arg(PropertyValue::reference("core:Config"))
            .creator(Arc::new(LambdaCreator::new("UserService", |args: Vec<ObjectInstance>| {
                let port = args[0]
                    .downcast_ref::<serde_json::Value>()
                    .and_then(|config| config["port"].as_u64())
                    .unwrap_or_default();
                Ok(Arc::new(port) as ObjectInstance)
            })))
            .build(),
        Some("core"),
    )?;
    bootstrapper.validate()?;

    let user = bootstrapper.get_singleton("userService").await?;
    assert_eq!(user.downcast_ref::<u64>(), Some(&8080));

    let same = bootstrapper.get_singleton("core:UserService").await?;
    assert!(Arc::ptr_eq(&user, &same));

    bootstrapper.reload();
    assert_eq!(bootstrapper.registry().read().count(), 0);
    Ok(())
}
