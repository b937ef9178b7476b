//! 对象定义实现
//!
//! 定义由 [`ObjectDefinitionBuilder`] 构建，构建完成后除属性包外不可变，
//! 以 `Arc` 形式在注册表中共享。

use di_abstractions::{BindHook, ObjectCreator, ObjectDefinition, ObjectInstance};
use ioc_common::{
    AttributeBag, CreateFrom, HandlerProp, ObjectIdentifier, Properties, PropertyValue, ScopeKind,
    ScopeOptions,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 对象定义实现
pub struct ObjectDefinitionImpl {
    uuid: ObjectIdentifier,
    id: Option<ObjectIdentifier>,
    name: String,
    namespace: Option<String>,
    creator: Option<Arc<dyn ObjectCreator>>,
    bind_hook: Option<BindHook>,
    construct_method: Option<String>,
    init_method: Option<String>,
    destroy_method: Option<String>,
    src_path: Option<String>,
    export: Option<String>,
    path: HashMap<String, String>,
    depends_on: Vec<ObjectIdentifier>,
    constructor_args: Vec<PropertyValue>,
    properties: Properties,
    scope: ScopeKind,
    scope_options: ScopeOptions,
    handler_props: Vec<HandlerProp>,
    create_from: CreateFrom,
    asynchronous: bool,
    attrs: AttributeBag,
}

impl ObjectDefinitionImpl {
    /// 创建构建器
    pub fn builder(
        uuid: impl Into<ObjectIdentifier>,
        name: impl Into<String>,
    ) -> ObjectDefinitionBuilder {
        ObjectDefinitionBuilder::new(uuid, name)
    }
}

impl fmt::Debug for ObjectDefinitionImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDefinitionImpl")
            .field("uuid", &self.uuid)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("creator", &self.creator.as_ref().map(|c| c.name().to_string()))
            .field("bind_hook", &self.bind_hook.is_some())
            .field("src_path", &self.src_path)
            .field("scope", &self.scope)
            .field("allow_downgrade", &self.scope_options.allow_downgrade)
            .field("depends_on", &self.depends_on)
            .field("create_from", &self.create_from)
            .finish_non_exhaustive()
    }
}

impl ObjectDefinition for ObjectDefinitionImpl {
    fn uuid(&self) -> &ObjectIdentifier {
        &self.uuid
    }

    fn id(&self) -> Option<&ObjectIdentifier> {
        self.id.as_ref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn creator(&self) -> Option<&Arc<dyn ObjectCreator>> {
        self.creator.as_ref()
    }

    fn construct_method(&self) -> Option<&str> {
        self.construct_method.as_deref()
    }

    fn init_method(&self) -> Option<&str> {
        self.init_method.as_deref()
    }

    fn destroy_method(&self) -> Option<&str> {
        self.destroy_method.as_deref()
    }

    fn src_path(&self) -> Option<&str> {
        self.src_path.as_deref()
    }

    fn export(&self) -> Option<&str> {
        self.export.as_deref()
    }

    fn path(&self) -> &HashMap<String, String> {
        &self.path
    }

    fn depends_on(&self) -> &[ObjectIdentifier] {
        &self.depends_on
    }

    fn constructor_args(&self) -> &[PropertyValue] {
        &self.constructor_args
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn scope(&self) -> ScopeKind {
        self.scope
    }

    fn allow_downgrade(&self) -> bool {
        self.scope_options.allow_downgrade
    }

    fn handler_props(&self) -> &[HandlerProp] {
        &self.handler_props
    }

    fn create_from(&self) -> CreateFrom {
        self.create_from
    }

    fn is_async(&self) -> bool {
        self.asynchronous
    }

    fn get_attr(&self, key: &str) -> Option<PropertyValue> {
        self.attrs.get(key)
    }

    fn has_attr(&self, key: &str) -> bool {
        self.attrs.contains(key)
    }

    fn set_attr(&self, key: ObjectIdentifier, value: PropertyValue) {
        self.attrs.set(key, value);
    }

    fn bind_hook(&self) -> Option<&BindHook> {
        self.bind_hook.as_ref()
    }
}

/// 对象定义构建器
///
/// 取代装饰器的注册表式 API，引导代码通过它生成定义。
pub struct ObjectDefinitionBuilder {
    definition: ObjectDefinitionImpl,
}

impl ObjectDefinitionBuilder {
    /// 创建新的构建器，默认单例作用域
    pub fn new(uuid: impl Into<ObjectIdentifier>, name: impl Into<String>) -> Self {
        Self {
            definition: ObjectDefinitionImpl {
                uuid: uuid.into(),
                id: None,
                name: name.into(),
                namespace: None,
                creator: None,
                bind_hook: None,
                construct_method: None,
                init_method: None,
                destroy_method: None,
                src_path: None,
                export: None,
                path: HashMap::new(),
                depends_on: Vec::new(),
                constructor_args: Vec::new(),
                properties: Properties::new(),
                scope: ScopeKind::default(),
                scope_options: ScopeOptions::default(),
                handler_props: Vec::new(),
                create_from: CreateFrom::default(),
                asynchronous: false,
                attrs: AttributeBag::new(),
            },
        }
    }

    /// 设置用户别名
    pub fn id(mut self, id: impl Into<ObjectIdentifier>) -> Self {
        self.definition.id = Some(id.into());
        self
    }

    /// 设置命名空间
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.definition.namespace = Some(namespace.into());
        self
    }

    /// 设置作用域
    pub fn scope(mut self, scope: ScopeKind) -> Self {
        self.definition.scope = scope;
        self
    }

    /// 允许请求作用域对象注入到单例
    pub fn allow_downgrade(mut self, allow: bool) -> Self {
        self.definition.scope_options.allow_downgrade = allow;
        self
    }

    /// 设置作用域选项
    pub fn scope_options(mut self, options: ScopeOptions) -> Self {
        self.definition.scope_options = options;
        self
    }

    /// 设置创建器
    pub fn creator(mut self, creator: Arc<dyn ObjectCreator>) -> Self {
        self.definition.creator = Some(creator);
        self
    }

    /// 设置绑定钩子
    pub fn bind_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ObjectInstance, &dyn ObjectDefinition) + Send + Sync + 'static,
    {
        self.definition.bind_hook = Some(Arc::new(hook));
        self
    }

    /// 设置构造方法名
    pub fn construct_method(mut self, method: impl Into<String>) -> Self {
        self.definition.construct_method = Some(method.into());
        self
    }

    /// 设置初始化钩子名
    pub fn init_method(mut self, method: impl Into<String>) -> Self {
        self.definition.init_method = Some(method.into());
        self
    }

    /// 设置销毁钩子名
    pub fn destroy_method(mut self, method: impl Into<String>) -> Self {
        self.definition.destroy_method = Some(method.into());
        self
    }

    /// 设置源文件路径
    pub fn src_path(mut self, src_path: impl Into<String>) -> Self {
        self.definition.src_path = Some(src_path.into());
        self
    }

    /// 设置导出名
    pub fn export(mut self, export: impl Into<String>) -> Self {
        self.definition.export = Some(export.into());
        self
    }

    /// 添加路径形式的属性值
    pub fn path(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.definition.path.insert(key.into(), value.into());
        self
    }

    /// 追加前置依赖
    pub fn depends_on(mut self, id: impl Into<ObjectIdentifier>) -> Self {
        self.definition.depends_on.push(id.into());
        self
    }

    /// 追加构造参数
    pub fn constructor_arg(mut self, arg: impl Into<PropertyValue>) -> Self {
        self.definition.constructor_args.push(arg.into());
        self
    }

    /// 设置注入属性
    pub fn property(
        mut self,
        key: impl Into<ObjectIdentifier>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.definition.properties.set_property(key, value);
        self
    }

    /// 追加自定义装饰器元数据
    pub fn handler_prop(mut self, prop: HandlerProp) -> Self {
        self.definition.handler_props.push(prop);
        self
    }

    /// 标记为异步创建
    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.definition.asynchronous = asynchronous;
        self
    }

    /// 设置定义来源
    pub fn create_from(mut self, create_from: CreateFrom) -> Self {
        self.definition.create_from = create_from;
        self
    }

    /// 完成构建
    pub fn build(self) -> Arc<ObjectDefinitionImpl> {
        Arc::new(self.definition)
    }
}
