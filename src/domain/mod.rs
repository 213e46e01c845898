//! Domain layer: values, type descriptors and the registry error taxonomy
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arguments;
pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod key;
pub mod value;

pub use arguments::Arguments;
pub use catalog::TypeCatalog;
pub use descriptor::{Construction, Constructor, Method, Param, TypeDescriptor, TypeKind};
pub use error::{ErrorKind, RegistryError, RegistryResult};
pub use key::{qualified_key, KeyKind};
pub use value::{Function, Instance, Value};
