//! Invocation engine: call functions and methods with autowired arguments

use tracing::{debug, instrument};

use crate::application::registry::Registry;
use crate::application::resolve::ResolveContext;
use crate::domain::{Arguments, Function, Instance, RegistryError, RegistryResult, Value};

/// Object a method is called on.
#[derive(Debug, Clone)]
pub enum Receiver {
    Instance(Instance),
    /// Resolved through the registry when registered, constructed otherwise.
    Type(String),
}

/// Anything `invoke` accepts.
#[derive(Debug, Clone)]
pub enum Target {
    Function(Function),
    /// Calls the instance's default method.
    Instance(Instance),
    /// `Type::method`, a registered entry, or a catalogued type.
    Name(String),
    Method(Receiver, String),
}

impl From<Function> for Target {
    fn from(function: Function) -> Self {
        Target::Function(function)
    }
}

impl From<Instance> for Target {
    fn from(instance: Instance) -> Self {
        Target::Instance(instance)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Name(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Name(name)
    }
}

impl From<(Instance, &str)> for Target {
    fn from((instance, method): (Instance, &str)) -> Self {
        Target::Method(Receiver::Instance(instance), method.to_string())
    }
}

impl From<(&str, &str)> for Target {
    fn from((type_name, method): (&str, &str)) -> Self {
        Target::Method(Receiver::Type(type_name.to_string()), method.to_string())
    }
}

impl Registry {
    /// Call `target`, binding its parameters like constructor parameters.
    #[instrument(level = "trace", skip(self, target, args))]
    pub fn invoke(&self, target: impl Into<Target>, args: Arguments) -> RegistryResult<Value> {
        self.call_target(target.into(), &args, &mut ResolveContext::default())
    }

    pub(crate) fn call_target(
        &self,
        target: Target,
        args: &Arguments,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Value> {
        match target {
            Target::Function(function) => self.call_function(&function, args, ctx),
            Target::Instance(instance) => {
                let method = self.options().default_method.clone();
                self.call_method(&instance, &method, args, ctx)
            }
            Target::Name(name) => self.call_named(&name, args, ctx),
            Target::Method(receiver, method) => {
                let instance = self.receiver_instance(receiver, ctx)?;
                self.call_method(&instance, &method, args, ctx)
            }
        }
    }

    fn call_named(
        &self,
        name: &str,
        args: &Arguments,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Value> {
        if let Some((type_name, method)) = name.split_once(self.options().method_separator.as_str())
        {
            let receiver = Receiver::Type(type_name.to_string());
            return self.call_target(Target::Method(receiver, method.to_string()), args, ctx);
        }

        if self.exists(name) {
            debug!("call_named: entry {}", name);
            return match self.resolve(name, ctx)? {
                Value::Function(function) => self.call_function(&function, args, ctx),
                Value::Instance(instance) => {
                    let method = self.options().default_method.clone();
                    self.call_method(&instance, &method, args, ctx)
                }
                _ => Err(RegistryError::NotCallable {
                    target: name.to_string(),
                }),
            };
        }

        if self.catalog().contains(name) {
            let receiver = Receiver::Type(name.to_string());
            let method = self.options().default_method.clone();
            return self.call_target(Target::Method(receiver, method), args, ctx);
        }

        Err(RegistryError::NotCallable {
            target: name.to_string(),
        })
    }

    fn receiver_instance(
        &self,
        receiver: Receiver,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Instance> {
        let type_name = match receiver {
            Receiver::Instance(instance) => return Ok(instance),
            Receiver::Type(type_name) => type_name,
        };
        let value = if self.exists(&type_name) {
            self.resolve(&type_name, ctx)?
        } else {
            self.construct(&type_name, &Arguments::new(), ctx)?
        };
        match value {
            Value::Instance(instance) => Ok(instance),
            _ => Err(RegistryError::NotCallable { target: type_name }),
        }
    }

    fn call_function(
        &self,
        function: &Function,
        args: &Arguments,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Value> {
        let bound = self.bind(function.params(), args, ctx)?;
        function.call(bound)
    }

    fn call_method(
        &self,
        instance: &Instance,
        method: &str,
        args: &Arguments,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Value> {
        let found = self
            .catalog()
            .find_method(instance.class(), method)
            .ok_or_else(|| RegistryError::NotCallable {
                target: format!(
                    "{}{}{}",
                    instance.class(),
                    self.options().method_separator,
                    method
                ),
            })?;
        debug!("call_method: {}::{}", instance.class(), method);
        let bound = self.bind(found.params(), args, ctx)?;
        found.call(instance, bound)
    }
}
