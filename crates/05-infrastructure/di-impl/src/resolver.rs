//! 定义级依赖解析器
//!
//! 在注册表之上遍历 `depends_on`、构造参数引用和属性引用，
//! 检查循环依赖、缺失依赖和单例注入请求作用域的约束，得到构建顺序。

use di_abstractions::{
    check_scope_compatibility, DefinitionRef, DependencyResolver, ObjectDefinitionRegistry,
    ResolutionPlan, ResolveContext, ResolveOptions,
};
use ioc_common::{CoreError, CoreResult, ObjectIdentifier};
use std::collections::HashSet;
use tracing::{debug, error};

/// 定义级依赖解析器
pub struct DefinitionResolver<'a, R>
where
    R: ObjectDefinitionRegistry + ?Sized,
{
    registry: &'a R,
    options: ResolveOptions,
}

/// 单次解析的可变状态
struct Walk {
    ctx: ResolveContext,
    order: Vec<ObjectIdentifier>,
    visited: HashSet<ObjectIdentifier>,
}

impl<'a, R> DefinitionResolver<'a, R>
where
    R: ObjectDefinitionRegistry + ?Sized,
{
    /// 创建新的解析器
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            options: ResolveOptions::default(),
        }
    }

    /// 设置解析选项
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    fn lookup(&self, identifier: &ObjectIdentifier, requesting: Option<&str>) -> CoreResult<DefinitionRef> {
        if let Some(definition) = self.registry.get_definition(identifier.as_str()) {
            return Ok(definition);
        }

        if let Some((namespace, _)) = identifier.split_namespace() {
            if !self.namespace_known(namespace) {
                return Err(CoreError::missing_import(identifier.as_str()));
            }
        }

        let err = CoreError::definition_not_found(identifier.clone());
        Err(match requesting {
            Some(class_name) => err.with_requesting_class(class_name),
            None => err,
        })
    }

    fn namespace_known(&self, namespace: &str) -> bool {
        self.registry.identifiers().iter().any(|id| {
            self.registry
                .get_definition(id.as_str())
                .is_some_and(|definition| definition.namespace() == Some(namespace))
        })
    }

    fn visit(
        &self,
        identifier: &ObjectIdentifier,
        definition: &DefinitionRef,
        walk: &mut Walk,
    ) -> CoreResult<()> {
        walk.ctx.push(identifier.clone())?;

        for reference in definition.references() {
            let dependency = self.lookup(&reference, Some(definition.name()))?;
            // 只比较直接的依赖方和被依赖方
            check_scope_compatibility(definition.as_ref(), dependency.as_ref())?;

            let canonical = self.registry.resolve_identifier(reference.as_str());
            // 仍在解析链上的标识必须重新进入，以便报告循环
            let in_chain = walk.ctx.resolution_chain.contains(&canonical);
            if in_chain || walk.visited.insert(canonical.clone()) {
                self.visit(&canonical, &dependency, walk)?;
            }
        }

        walk.ctx.pop();
        if !walk.order.contains(identifier) {
            walk.order.push(identifier.clone());
        }
        Ok(())
    }
}

impl<R> DependencyResolver for DefinitionResolver<'_, R>
where
    R: ObjectDefinitionRegistry + ?Sized,
{
    fn resolve(&self, identifier: &str) -> CoreResult<ResolutionPlan> {
        let requested = ObjectIdentifier::from(identifier);
        let definition = self.lookup(&requested, None)?;
        let root = self.registry.resolve_identifier(identifier);

        let mut walk = Walk {
            ctx: ResolveContext::with_options(self.options.clone()),
            order: Vec::new(),
            visited: HashSet::new(),
        };
        self.visit(&root, &definition, &mut walk)?;

        debug!("解析 {} 完成, 构建顺序: {:?}", identifier, walk.order);
        Ok(ResolutionPlan {
            root,
            order: walk.order,
        })
    }

    fn validate_all(&self) -> CoreResult<()> {
        for identifier in self.registry.identifiers() {
            if let Err(e) = self.resolve(identifier.as_str()) {
                error!("定义 {} 验证失败: {}", identifier, e);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ObjectDefinitionImpl;
    use crate::registry::ObjectDefinitionRegistryImpl;
    use ioc_common::{FrameworkErrorCode, PropertyValue, ScopeKind};

    fn register(registry: &mut ObjectDefinitionRegistryImpl, definition: DefinitionRef) {
        let identity = definition.identity();
        let namespace = definition.namespace().map(str::to_string);
        registry.register_definition(identity.uuid.clone(), definition);
        registry
            .identifier_relation_mut()
            .save_class_relation(&identity, namespace.as_deref());
    }

    fn ids(plan: &ResolutionPlan) -> Vec<&str> {
        plan.order.iter().map(ObjectIdentifier::as_str).collect()
    }

    #[test]
    fn test_plan_orders_dependencies_first() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(&mut registry, ObjectDefinitionImpl::builder("u-config", "Config").build());
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-logger", "Logger")
                .depends_on("Config")
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-user", "UserService")
                .constructor_arg(PropertyValue::reference("Logger"))
                .property("config", PropertyValue::reference("u-config"))
                .build(),
        );

        let resolver = DefinitionResolver::new(&registry);
        let plan = resolver.resolve("UserService").unwrap();
        assert_eq!(plan.root, "u-user");
        assert_eq!(ids(&plan), vec!["u-config", "u-logger", "u-user"]);
        assert!(resolver.validate_all().is_ok());
    }

    #[test]
    fn test_missing_dependency_names_requesting_class() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-user", "UserService")
                .property("cache", PropertyValue::reference("cache"))
                .build(),
        );

        let resolver = DefinitionResolver::new(&registry);
        let err = resolver.resolve("UserService").unwrap_err();
        assert!(err.is_definition_not_found());
        assert_eq!(
            err.to_string(),
            "cache in class UserService is not valid in current context"
        );

        let err = resolver.resolve("nothing").unwrap_err();
        assert_eq!(err.to_string(), "nothing is not valid in current context");
        assert!(!resolver.can_resolve("nothing"));
    }

    #[test]
    fn test_unknown_namespace_is_missing_import() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-user", "UserService")
                .namespace("core")
                .property("pool", PropertyValue::reference("db:Pool"))
                .property("helper", PropertyValue::reference("core:Missing"))
                .build(),
        );

        let resolver = DefinitionResolver::new(&registry);
        let err = resolver.resolve("core:UserService").unwrap_err();
        assert_eq!(err.kind(), FrameworkErrorCode::MissingImports);
        assert!(err.to_string().contains("\"db:Pool\""));
    }

    #[test]
    fn test_known_namespace_missing_class_is_not_found() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-user", "UserService")
                .namespace("core")
                .property("helper", PropertyValue::reference("core:Missing"))
                .build(),
        );

        let err = DefinitionResolver::new(&registry)
            .resolve("u-user")
            .unwrap_err();
        assert!(err.is_definition_not_found());
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-a", "A").depends_on("B").build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-b", "B").depends_on("A").build(),
        );

        let err = DefinitionResolver::new(&registry).resolve("A").unwrap_err();
        assert_eq!(err.kind(), FrameworkErrorCode::Common);
        assert!(err.to_string().contains("u-a -> u-b -> u-a"));
    }

    #[test]
    fn test_cycle_between_prototypes_under_one_singleton() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-x", "X")
                .scope(ScopeKind::Prototype)
                .depends_on("Y")
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-y", "Y")
                .scope(ScopeKind::Prototype)
                .depends_on("X")
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-s", "S").depends_on("X").build(),
        );

        let err = DefinitionResolver::new(&registry).resolve("S").unwrap_err();
        assert!(err.to_string().contains("circular dependency detected"));
    }

    #[test]
    fn test_shared_dependency_appears_once() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(&mut registry, ObjectDefinitionImpl::builder("u-db", "Db").build());
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-repo", "Repo").depends_on("Db").build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-svc", "Service")
                .depends_on("Db")
                .depends_on("Repo")
                .build(),
        );

        let plan = DefinitionResolver::new(&registry).resolve("Service").unwrap();
        assert_eq!(ids(&plan), vec!["u-db", "u-repo", "u-svc"]);
        assert!(plan.contains("u-db"));
    }

    #[test]
    fn test_max_depth_option() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(&mut registry, ObjectDefinitionImpl::builder("u-c", "C").build());
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-b", "B").depends_on("C").build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-a", "A").depends_on("B").build(),
        );

        let resolver =
            DefinitionResolver::new(&registry).with_options(ResolveOptions { max_depth: 2 });
        let err = resolver.resolve("A").unwrap_err();
        assert!(err.to_string().contains("max depth 2"));
        assert!(resolver.resolve("B").is_ok());
    }

    #[test]
    fn test_singleton_cannot_hold_request_scope() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-ctx", "RequestContext")
                .scope(ScopeKind::Request)
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-user", "UserService")
                .property("ctx", PropertyValue::reference("RequestContext"))
                .build(),
        );

        let err = DefinitionResolver::new(&registry)
            .resolve("UserService")
            .unwrap_err();
        assert_eq!(err.kind(), FrameworkErrorCode::SingletonInjectRequest);
        assert!(err.to_string().contains("UserService"));
        assert!(err.to_string().contains("RequestContext"));
    }

    #[test]
    fn test_request_scope_may_depend_on_request_scope() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-ctx", "RequestContext")
                .scope(ScopeKind::Request)
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-handler", "Handler")
                .scope(ScopeKind::Request)
                .property("ctx", PropertyValue::reference("RequestContext"))
                .build(),
        );

        assert!(DefinitionResolver::new(&registry).resolve("Handler").is_ok());
    }

    #[test]
    fn test_scope_check_applies_to_direct_dependent_only() {
        let mut registry = ObjectDefinitionRegistryImpl::new();
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-ctx", "RequestContext")
                .scope(ScopeKind::Request)
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-session", "Session")
                .scope(ScopeKind::Request)
                .allow_downgrade(true)
                .property("ctx", PropertyValue::reference("RequestContext"))
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-helper", "Helper")
                .scope(ScopeKind::Prototype)
                .property("ctx", PropertyValue::reference("RequestContext"))
                .build(),
        );
        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-user", "UserService")
                .property("session", PropertyValue::reference("Session"))
                .property("helper", PropertyValue::reference("Helper"))
                .build(),
        );

        // 降级注入的请求作用域对象可以继续注入请求上下文
        let resolver = DefinitionResolver::new(&registry);
        let plan = resolver.resolve("UserService").unwrap();
        assert_eq!(ids(&plan), vec!["u-ctx", "u-session", "u-helper", "u-user"]);
        assert!(resolver.validate_all().is_ok());

        register(
            &mut registry,
            ObjectDefinitionImpl::builder("u-audit", "Audit")
                .property("ctx", PropertyValue::reference("RequestContext"))
                .build(),
        );
        let err = DefinitionResolver::new(&registry)
            .resolve("Audit")
            .unwrap_err();
        assert_eq!(err.kind(), FrameworkErrorCode::SingletonInjectRequest);
        assert!(err.to_string().starts_with("Audit with singleton scope"));
    }
}
