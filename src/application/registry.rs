//! Registry: ordered entry store with factory resolution
//!
//! Entries hold either a literal value or a stack of factories. The most
//! recently set factory sits on top and reaches older ones through
//! `Make::inner`. A resolved factory result replaces the stack and is
//! returned on every later `get`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::application::factories;
use crate::application::resolve::{Factory, Make, ResolveContext};
use crate::config::ResolutionConfig;
use crate::domain::{
    Arguments, Function, Instance, KeyKind, RegistryError, RegistryResult, TypeCatalog, Value,
};

/// What can be stored under a key.
#[derive(Debug, Clone)]
pub enum Payload {
    Value(Value),
    Arguments(Arguments),
    Factory(Factory),
}

macro_rules! payload_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Payload::Value(value.into())
                }
            }
        )*
    };
}

payload_from_value!(Value, &str, String, bool, i32, i64, f64, Vec<Value>, Instance, Function);

impl From<Arguments> for Payload {
    fn from(args: Arguments) -> Self {
        Payload::Arguments(args)
    }
}

impl From<Factory> for Payload {
    fn from(factory: Factory) -> Self {
        Payload::Factory(factory)
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Value(Value),
    Factories(Vec<Factory>),
}

#[derive(Debug)]
struct Entry {
    kind: KeyKind,
    slot: Slot,
}

#[derive(Debug, Default)]
struct EntryStore {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
    frozen: HashSet<String>,
    all_frozen: bool,
}

impl EntryStore {
    fn is_frozen(&self, key: &str) -> bool {
        self.all_frozen || self.frozen.contains(key)
    }

    /// Store `slot` under `key`; a factory on top of factories is stacked.
    fn insert(&mut self, key: &str, kind: KeyKind, slot: Slot) {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.kind = kind;
                match (slot, &mut entry.slot) {
                    (Slot::Factories(added), Slot::Factories(stack)) => stack.extend(added),
                    (slot, current) => *current = slot,
                }
            }
            None => {
                self.order.push(key.to_string());
                self.entries.insert(key.to_string(), Entry { kind, slot });
            }
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
        self.frozen.remove(key);
    }
}

/// Service registry and dependency-injection engine.
///
/// Single-threaded: share it with `Rc` and keep one resolution in flight.
pub struct Registry {
    catalog: Rc<TypeCatalog>,
    delegate: Option<Rc<Registry>>,
    options: ResolutionConfig,
    store: RefCell<EntryStore>,
}

impl Registry {
    /// Create an empty registry that resolves parameters from itself.
    pub fn new(catalog: Rc<TypeCatalog>) -> Self {
        Self {
            catalog,
            delegate: None,
            options: ResolutionConfig::default(),
            store: RefCell::new(EntryStore::default()),
        }
    }

    /// Create an empty registry that resolves parameters from `delegate`.
    pub fn with_delegate(catalog: Rc<TypeCatalog>, delegate: Rc<Registry>) -> Self {
        Self {
            delegate: Some(delegate),
            ..Self::new(catalog)
        }
    }

    pub fn with_options(mut self, options: ResolutionConfig) -> Self {
        self.options = options;
        self
    }

    /// Set initial entries in iteration order.
    pub fn with_entries<K, P, I>(self, entries: I) -> RegistryResult<Self>
    where
        K: AsRef<str>,
        P: Into<Payload>,
        I: IntoIterator<Item = (K, P)>,
    {
        for (key, payload) in entries {
            self.set(key.as_ref(), payload)?;
        }
        Ok(self)
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &ResolutionConfig {
        &self.options
    }

    /// Registry used to resolve parameters and references.
    pub fn delegate(&self) -> &Registry {
        self.delegate.as_deref().unwrap_or(self)
    }

    pub fn len(&self) -> usize {
        self.store.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.store.borrow().order.clone()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.store.borrow().entries.contains_key(key)
    }

    pub fn is_frozen(&self, key: &str) -> bool {
        self.store.borrow().is_frozen(key)
    }

    /// Store a value, arguments or factory under `key`.
    ///
    /// Type keys always end up holding a factory; a factory set over an
    /// existing factory decorates it.
    #[instrument(level = "trace", skip(self, payload))]
    pub fn set(&self, key: &str, payload: impl Into<Payload>) -> RegistryResult<()> {
        if key.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "entry key must not be empty".into(),
            ));
        }
        if self.is_frozen(key) {
            return Err(RegistryError::frozen(Some(key)));
        }

        let kind = KeyKind::classify(key, &self.catalog, &self.options.qualifier_separator);
        let slot = self.normalize(key, &kind, payload.into())?;
        debug!(
            "set: key={} type={:?} factory={}",
            key,
            kind.type_name(),
            matches!(slot, Slot::Factories(_))
        );
        self.store.borrow_mut().insert(key, kind, slot);
        Ok(())
    }

    fn normalize(&self, key: &str, kind: &KeyKind, payload: Payload) -> RegistryResult<Slot> {
        let invalid = || RegistryError::InvalidFactory {
            entry: key.to_string(),
        };
        let factory = match (kind.type_name(), payload) {
            (_, Payload::Factory(factory)) => factory,
            (None, Payload::Arguments(_)) => return Err(invalid()),
            (None, Payload::Value(value)) => return Ok(Slot::Value(value)),
            (Some(type_name), Payload::Arguments(args)) => factories::build(type_name, args),
            (Some(_), Payload::Value(Value::Str(other))) if self.catalog.contains(&other) => {
                factories::build(other, Arguments::new())
            }
            (Some(_), Payload::Value(Value::Function(function))) => {
                Factory::new(move |make| make.invoke(function.clone(), Arguments::new()))
            }
            (Some(_), Payload::Value(_)) => return Err(invalid()),
        };
        Ok(Slot::Factories(vec![factory]))
    }

    /// Resolve `key` to its value, running and caching its factory on first use.
    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, key: &str) -> RegistryResult<Value> {
        self.resolve(key, &mut ResolveContext::default())
    }

    pub(crate) fn resolve(&self, key: &str, ctx: &mut ResolveContext) -> RegistryResult<Value> {
        let (kind, stack) = {
            let store = self.store.borrow();
            let entry = store
                .entries
                .get(key)
                .ok_or_else(|| RegistryError::not_found(key))?;
            match &entry.slot {
                Slot::Value(value) => return Ok(value.clone()),
                Slot::Factories(stack) => (entry.kind.clone(), stack.clone()),
            }
        };

        debug!("resolve: key={} factories={}", key, stack.len());
        let value = ctx.with_entry(self.address(), key, |ctx| {
            let Some((top, below)) = stack.split_last() else {
                return Err(RegistryError::not_found(key));
            };
            let mut make = Make::new(self, key, &kind, below, ctx);
            top.call(&mut make)
        })?;

        self.check_contract(key, &kind, &value)?;
        self.memoize(key, &value);
        Ok(value)
    }

    /// Resolution below the bottom factory of a stack.
    pub(crate) fn resolve_undecorated(
        &self,
        key: &str,
        kind: &KeyKind,
        ctx: &mut ResolveContext,
    ) -> RegistryResult<Value> {
        if let Some(delegate) = &self.delegate {
            if delegate.exists(key) {
                trace!("resolve_undecorated: key={} from delegate", key);
                return delegate.resolve(key, ctx);
            }
        }
        match kind.type_name() {
            Some(type_name) => self.construct(type_name, &Arguments::new(), ctx),
            None => Err(RegistryError::not_found(key)),
        }
    }

    fn check_contract(&self, key: &str, kind: &KeyKind, value: &Value) -> RegistryResult<()> {
        let Some(type_name) = kind.type_name() else {
            return Ok(());
        };
        match value.as_instance() {
            Some(instance) if self.catalog.is_subtype(instance.class(), type_name) => Ok(()),
            _ => Err(RegistryError::FactoryContract {
                entry: key.to_string(),
                type_name: type_name.to_string(),
            }),
        }
    }

    fn memoize(&self, key: &str, value: &Value) {
        let mut store = self.store.borrow_mut();
        let Some(entry) = store.entries.get_mut(key) else {
            // unset while its factory was running
            return;
        };
        entry.slot = Slot::Value(value.clone());
        if self.options.freeze_on_resolve {
            store.frozen.insert(key.to_string());
        }
    }

    /// Remove `key`; missing keys are ignored.
    pub fn unset(&self, key: &str) -> RegistryResult<()> {
        let mut store = self.store.borrow_mut();
        if store.all_frozen {
            return Err(RegistryError::frozen(None));
        }
        debug!("unset: key={}", key);
        store.remove(key);
        Ok(())
    }

    /// Freeze the whole registry; returns the number of keys.
    pub fn freeze_all(&self) -> usize {
        let mut store = self.store.borrow_mut();
        store.all_frozen = true;
        debug!("freeze_all: keys={}", store.order.len());
        store.order.len()
    }

    /// Freeze one key; returns the number of frozen keys.
    pub fn freeze(&self, key: &str) -> usize {
        let mut store = self.store.borrow_mut();
        if store.all_frozen {
            return store.order.len();
        }
        store.frozen.insert(key.to_string());
        store.frozen.len()
    }
}

impl Registry {
    /// Identity of this registry while a resolution borrows it.
    fn address(&self) -> usize {
        std::ptr::from_ref(self) as usize
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("Registry")
            .field("keys", &store.order)
            .field("all_frozen", &store.all_frozen)
            .field("has_delegate", &self.delegate.is_some())
            .finish()
    }
}
