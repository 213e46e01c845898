//! Ready-made factories for common wiring

use crate::application::resolve::Factory;
use crate::domain::{Arguments, Instance, Value};

/// Always yield the given instance.
pub fn reference(instance: Instance) -> Factory {
    Factory::new(move |_| Ok(Value::Instance(instance.clone())))
}

/// Resolve another key of the owning registry.
pub fn alias(key: impl Into<String>) -> Factory {
    let key = key.into();
    Factory::new(move |make| make.get(&key))
}

/// Defer to the decorated factory, the delegate, or plain construction.
pub fn automake() -> Factory {
    Factory::new(|make| make.inner())
}

/// Construct `type_name` with `args` on every evaluation.
pub fn build(type_name: impl Into<String>, args: Arguments) -> Factory {
    let type_name = type_name.into();
    Factory::new(move |make| make.build(&type_name, args.clone()))
}

/// Construct `type_name` without explicit arguments on every evaluation.
pub fn instantiate(type_name: impl Into<String>) -> Factory {
    build(type_name, Arguments::new())
}
