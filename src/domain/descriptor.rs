//! Type descriptors: explicit constructor and method metadata for autowiring
//!
//! Each constructible type is described once, at catalog-building time:
//! its kind, the types it satisfies, its constructor parameters and its
//! callable methods. The engine binds parameters from these descriptors
//! instead of inspecting types at runtime.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::domain::error::{RegistryError, RegistryResult};
use crate::domain::value::{Instance, Value};

/// A formal parameter of a constructor, method or function.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    type_name: Option<String>,
    default: Option<Value>,
    nullable: bool,
    variadic: bool,
}

impl Param {
    /// Untyped parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            default: None,
            nullable: false,
            variadic: false,
        }
    }

    /// Parameter declared with a type that can be autowired.
    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name).of_type(type_name)
    }

    pub fn of_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Collects all remaining positional arguments. Must be the last parameter.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

/// What a type identifier denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Concrete,
    Abstract,
    Interface,
}

type ConstructBody = dyn Fn(Vec<Value>) -> RegistryResult<Rc<dyn Any>>;
type BareBody = dyn Fn() -> Rc<dyn Any>;
type MethodBody = dyn Fn(&Instance, Vec<Value>) -> RegistryResult<Value>;

/// Declared constructor: parameters plus the body receiving bound arguments.
#[derive(Clone)]
pub struct Constructor {
    params: Vec<Param>,
    body: Rc<ConstructBody>,
}

impl Constructor {
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn call(&self, args: Vec<Value>) -> RegistryResult<Rc<dyn Any>> {
        (self.body)(args)
    }
}

/// How instances of a concrete type come into existence.
#[derive(Clone)]
pub enum Construction {
    /// No declared constructor: a bare instance, no parameter binding.
    Bare(Rc<BareBody>),
    Constructor(Constructor),
}

/// A callable method of a type.
#[derive(Clone)]
pub struct Method {
    params: Vec<Param>,
    body: Rc<MethodBody>,
}

impl Method {
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn call(&self, receiver: &Instance, args: Vec<Value>) -> RegistryResult<Value> {
        (self.body)(receiver, args)
    }
}

/// Everything the engine knows about one type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    supertypes: Vec<String>,
    construction: Option<Construction>,
    methods: HashMap<String, Method>,
}

impl TypeDescriptor {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            supertypes: Vec::new(),
            construction: None,
            methods: HashMap::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Abstract)
    }

    /// Concrete type without a declared constructor.
    pub fn concrete<T, F>(name: impl Into<String>, create: F) -> Self
    where
        T: Any,
        F: Fn() -> T + 'static,
    {
        let mut descriptor = Self::with_kind(name, TypeKind::Concrete);
        descriptor.construction = Some(Construction::Bare(Rc::new(move || {
            Rc::new(create()) as Rc<dyn Any>
        })));
        descriptor
    }

    /// Concrete type whose constructor takes `params`.
    pub fn constructed<T, F>(name: impl Into<String>, params: Vec<Param>, body: F) -> Self
    where
        T: Any,
        F: Fn(Vec<Value>) -> RegistryResult<T> + 'static,
    {
        let mut descriptor = Self::with_kind(name, TypeKind::Concrete);
        descriptor.construction = Some(Construction::Constructor(Constructor {
            params,
            body: Rc::new(move |args| body(args).map(|object| Rc::new(object) as Rc<dyn Any>)),
        }));
        descriptor
    }

    /// Declare a supertype (interface or parent) this type satisfies.
    pub fn implements(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Declare a method callable on instances whose object is a `T`.
    pub fn method<T, F>(mut self, name: impl Into<String>, params: Vec<Param>, body: F) -> Self
    where
        T: Any,
        F: Fn(&T, Vec<Value>) -> RegistryResult<Value> + 'static,
    {
        let type_name = self.name.clone();
        let method = Method {
            params,
            body: Rc::new(move |receiver: &Instance, args| {
                let this = receiver.downcast_ref::<T>().ok_or_else(|| {
                    RegistryError::construction(
                        type_name.as_str(),
                        format!("receiver [{}] has an unexpected layout", receiver.class()),
                    )
                })?;
                body(this, args)
            }),
        };
        self.methods.insert(name.into(), method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    pub fn construction(&self) -> Option<&Construction> {
        self.construction.as_ref()
    }

    pub fn get_method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Abstract types and interfaces cannot be instantiated.
    pub fn is_instantiable(&self) -> bool {
        self.kind == TypeKind::Concrete && self.construction.is_some()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("supertypes", &self.supertypes)
            .field(
                "params",
                &match &self.construction {
                    Some(Construction::Constructor(c)) => Some(c.params()),
                    _ => None,
                },
            )
            .field("methods", &methods)
            .finish()
    }
}
