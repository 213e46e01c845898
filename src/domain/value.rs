//! Dynamic values stored in and produced by the registry

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::domain::descriptor::Param;
use crate::domain::error::{RegistryError, RegistryResult};

/// A constructed object together with the name of its concrete type.
///
/// Cloning shares the underlying object, so identity survives caching.
#[derive(Clone)]
pub struct Instance {
    class: Rc<str>,
    object: Rc<dyn Any>,
}

impl Instance {
    pub fn new<T: Any>(class: impl Into<Rc<str>>, object: T) -> Self {
        Self {
            class: class.into(),
            object: Rc::new(object),
        }
    }

    pub(crate) fn from_rc(class: impl Into<Rc<str>>, object: Rc<dyn Any>) -> Self {
        Self {
            class: class.into(),
            object,
        }
    }

    /// Name of the concrete type this instance was built as.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.object).downcast::<T>().ok()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({} @ {:p})", self.class, Rc::as_ptr(&self.object))
    }
}

type FunctionBody = dyn Fn(Vec<Value>) -> RegistryResult<Value>;

/// A free-standing callable with declared parameters.
#[derive(Clone)]
pub struct Function {
    params: Rc<[Param]>,
    body: Rc<FunctionBody>,
}

impl Function {
    pub fn new<F>(params: Vec<Param>, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> RegistryResult<Value> + 'static,
    {
        Self {
            params: params.into(),
            body: Rc::new(body),
        }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Call with already bound arguments.
    pub fn call(&self, args: Vec<Value>) -> RegistryResult<Value> {
        (self.body)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.params.iter().map(Param::name).collect();
        write!(f, "Function({})", names.join(", "))
    }
}

/// Any value the registry can hold, bind or return.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Instance(Instance),
    Function(Function),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Take the instance out of this value or report what was found instead.
    ///
    /// Meant for constructor and function bodies unpacking bound arguments.
    pub fn into_instance(self, context: &str) -> RegistryResult<Instance> {
        match self {
            Value::Instance(instance) => Ok(instance),
            other => Err(RegistryError::construction(
                context,
                format!("expected an instance, got {}", other.type_label()),
            )),
        }
    }

    /// String counterpart of [`Value::into_instance`].
    pub fn into_string(self, context: &str) -> RegistryResult<String> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(RegistryError::construction(
                context,
                format!("expected a string, got {}", other.type_label()),
            )),
        }
    }

    /// Short label used in diagnostics.
    pub fn type_label(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Instance(instance) => instance.class(),
            Value::Function(_) => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Instance(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}
