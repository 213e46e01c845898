//! Factory resolution: the `Make` helper handed to factories and the
//! per-call resolution context
//!
//! A factory's only dependency-injection surface is [`Make`]:
//! - `inner()` evaluates the factory it decorates, bottoming out at the
//!   delegate registry or at plain construction of the key's type;
//! - `build(type, args)` runs the construction engine;
//! - `get(key)` resolves another entry of the owning registry.

use std::fmt;
use std::rc::Rc;

use crate::application::invoke::Target;
use crate::application::registry::Registry;
use crate::domain::{Arguments, KeyKind, RegistryError, RegistryResult, Value};

/// State of one top-level `get`/`make`/`invoke` call.
///
/// `loading` is the active construction path (a stack of type names);
/// `resolving` holds the factory-backed entries currently being evaluated.
#[derive(Debug, Default)]
pub(crate) struct ResolveContext {
    loading: Vec<String>,
    resolving: Vec<(usize, String)>,
}

impl ResolveContext {
    pub(crate) fn loading(&self) -> &[String] {
        &self.loading
    }

    /// Type currently being constructed, if any.
    pub(crate) fn current_type(&self) -> Option<&str> {
        self.loading.last().map(String::as_str)
    }

    /// Run `f` with `type_name` pushed on the loading stack.
    ///
    /// The stack is restored whether `f` succeeds or fails.
    pub(crate) fn with_type<T>(
        &mut self,
        type_name: &str,
        f: impl FnOnce(&mut Self) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        if self.loading.iter().any(|t| t == type_name) {
            return Err(RegistryError::CyclicDependency(type_name.to_string()));
        }
        self.loading.push(type_name.to_string());
        let result = f(self);
        self.loading.pop();
        result
    }

    /// Run `f` while entry `key` of registry `registry_id` is being resolved.
    pub(crate) fn with_entry<T>(
        &mut self,
        registry_id: usize,
        key: &str,
        f: impl FnOnce(&mut Self) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        if self
            .resolving
            .iter()
            .any(|(id, k)| *id == registry_id && k == key)
        {
            return Err(RegistryError::CyclicDependency(key.to_string()));
        }
        self.resolving.push((registry_id, key.to_string()));
        let result = f(self);
        self.resolving.pop();
        result
    }
}

type FactoryFn = dyn Fn(&mut Make<'_>) -> RegistryResult<Value>;

/// Deferred constructor for an entry.
#[derive(Clone)]
pub struct Factory(Rc<FactoryFn>);

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Make<'_>) -> RegistryResult<Value> + 'static,
    {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, make: &mut Make<'_>) -> RegistryResult<Value> {
        (self.0)(make)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory({:p})", Rc::as_ptr(&self.0))
    }
}

/// Helper passed to a factory while it runs.
pub struct Make<'a> {
    registry: &'a Registry,
    key: &'a str,
    kind: &'a KeyKind,
    below: &'a [Factory],
    ctx: &'a mut ResolveContext,
}

impl<'a> Make<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        key: &'a str,
        kind: &'a KeyKind,
        below: &'a [Factory],
        ctx: &'a mut ResolveContext,
    ) -> Self {
        Self {
            registry,
            key,
            kind,
            below,
            ctx,
        }
    }

    /// Key of the entry being resolved.
    pub fn key(&self) -> &str {
        self.key
    }

    /// Registry owning the entry.
    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Types under construction at this point, outermost first.
    pub fn loading_path(&self) -> &[String] {
        self.ctx.loading()
    }

    /// Evaluate the factory this one decorates.
    ///
    /// Without a previous factory the delegate resolves the key when it has
    /// it; otherwise a type key is constructed from its type.
    pub fn inner(&mut self) -> RegistryResult<Value> {
        match self.below.split_last() {
            Some((previous, rest)) => {
                let mut make = Make::new(self.registry, self.key, self.kind, rest, self.ctx);
                previous.call(&mut make)
            }
            None => self
                .registry
                .resolve_undecorated(self.key, self.kind, self.ctx),
        }
    }

    /// Construct `type_name` with `args`; unbound parameters come from the delegate.
    pub fn build(&mut self, type_name: &str, args: Arguments) -> RegistryResult<Value> {
        self.registry.construct(type_name, &args, self.ctx)
    }

    /// Resolve another entry of the owning registry.
    pub fn get(&mut self, key: &str) -> RegistryResult<Value> {
        self.registry.resolve(key, self.ctx)
    }

    /// Invoke a target with autowired arguments.
    pub fn invoke(&mut self, target: impl Into<Target>, args: Arguments) -> RegistryResult<Value> {
        self.registry.call_target(target.into(), &args, self.ctx)
    }
}
