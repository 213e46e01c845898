//! Construction engine and parameter binding
//!
//! Binding precedence for each declared parameter (first match wins):
//! 1. positional argument at the parameter's index
//! 2. named argument
//! 3. `Type$param` registered in the delegate (catalogued `Type` only)
//! 4. `Type` registered in the delegate (catalogued `Type` only)
//! 5. declared default
//! 6. `Null` for nullable parameters
//!
//! A variadic parameter takes every remaining positional argument.

use tracing::{debug, instrument, trace};

use crate::application::registry::Registry;
use crate::application::resolve::ResolveContext;
use crate::domain::{
    qualified_key, Arguments, Construction, Instance, Param, RegistryError, RegistryResult, Value,
};

impl Registry {
    /// Construct a new instance of `type_name`, autowiring what `args` leaves open.
    ///
    /// Never consults or updates the entry cache for `type_name` itself.
    #[instrument(level = "trace", skip(self, args))]
    pub fn make(&self, type_name: &str, args: Arguments) -> RegistryResult<Value> {
        self.construct(type_name, &args, &mut ResolveContext::default())
    }

    pub(crate) fn construct(
        &self,
        type_name: &str,
        args: &Arguments,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Value> {
        let descriptor = self.catalog().get(type_name).ok_or_else(|| {
            RegistryError::InvalidArgument(format!("invalid type [{type_name}]"))
        })?;

        let construction = match descriptor.construction() {
            Some(construction) if descriptor.is_instantiable() => construction,
            _ => {
                return Err(RegistryError::Unconstructible {
                    target: type_name.to_string(),
                    path: ctx.loading().to_vec(),
                })
            }
        };

        match construction {
            Construction::Bare(create) => {
                trace!("construct: bare {}", type_name);
                Ok(Value::Instance(Instance::from_rc(type_name, create())))
            }
            Construction::Constructor(constructor) => {
                let object = ctx.with_type(type_name, |ctx| {
                    debug!(
                        "construct: {} params={} depth={}",
                        type_name,
                        constructor.params().len(),
                        ctx.loading().len()
                    );
                    let bound = self.bind(constructor.params(), args, ctx)?;
                    constructor.call(bound)
                })?;
                Ok(Value::Instance(Instance::from_rc(type_name, object)))
            }
        }
    }

    /// Bind declared parameters against `args`, then the delegate.
    pub(crate) fn bind(
        &self,
        params: &[Param],
        args: &Arguments,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Vec<Value>> {
        let mut bound = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            if param.is_variadic() {
                let mut rest = Vec::new();
                for value in args.positional_from(index) {
                    rest.push(self.resolve_argument(value, ctx)?);
                }
                bound.push(Value::List(rest));
                break;
            }
            bound.push(self.bind_param(index, param, args, ctx)?);
        }
        Ok(bound)
    }

    fn bind_param(
        &self,
        index: usize,
        param: &Param,
        args: &Arguments,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Value> {
        if let Some(value) = args
            .positional(index)
            .or_else(|| args.get_named(param.name()))
        {
            return self.resolve_argument(value, ctx);
        }

        if let Some(type_name) = param.type_name().filter(|t| self.catalog().contains(t)) {
            let delegate = self.delegate();
            let qualified = qualified_key(
                type_name,
                param.name(),
                &self.options().qualifier_separator,
            );
            if delegate.exists(&qualified) {
                trace!("bind_param: {} <- {}", param.name(), qualified);
                return delegate.resolve(&qualified, ctx);
            }
            if delegate.exists(type_name) {
                trace!("bind_param: {} <- {}", param.name(), type_name);
                return delegate.resolve(type_name, ctx);
            }
        }

        if let Some(default) = param.default_value() {
            return Ok(default.clone());
        }
        if param.is_nullable() {
            return Ok(Value::Null);
        }

        Err(RegistryError::MissingParameter {
            parameter: param.name().to_string(),
            owner: ctx.current_type().map(str::to_string),
        })
    }

    /// Resolve `$key` references and registered type names; pass the rest through.
    fn resolve_argument(&self, value: &Value, ctx: &mut ResolveContext) -> RegistryResult<Value> {
        let Value::Str(text) = value else {
            return Ok(value.clone());
        };
        let delegate = self.delegate();

        if let Some(reference) = text.strip_prefix(self.options().reference_marker.as_str()) {
            if !reference.is_empty() {
                return delegate.resolve(reference, ctx);
            }
        }
        if self.catalog().contains(text) && delegate.exists(text) {
            return delegate.resolve(text, ctx);
        }
        Ok(value.clone())
    }
}
