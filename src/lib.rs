//! rwire: a service registry and dependency-injection engine
//!
//! Keys map to literal values or lazily evaluated factories. Factories can
//! decorate one another, construct catalogued types with autowired
//! parameters, and fall back to a delegate registry.
//!
//! ```ignore
//! let catalog = TypeCatalog::new()
//!     .with(TypeDescriptor::interface("Engine"))
//!     .with(TypeDescriptor::concrete("V8", || V8).implements("Engine"));
//! let di = Registry::new(Rc::new(catalog));
//! di.set("Engine", "V8")?;
//! let engine = di.get("Engine")?;
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::{factories, Factory, Make, Payload, Receiver, Registry, Target};
pub use domain::{
    Arguments, ErrorKind, Function, Instance, Param, RegistryError, RegistryResult,
    TypeCatalog, TypeDescriptor, TypeKind, Value,
};
