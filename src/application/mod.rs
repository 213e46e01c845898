//! Application layer: the registry engine
//!
//! Entry store, factory resolution, construction and invocation share the
//! `Registry` type; each concern lives in its own module.

mod construct;
pub mod error;
pub mod error_ext;
pub mod factories;
pub mod invoke;
pub mod registry;
pub mod resolve;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use invoke::{Receiver, Target};
pub use registry::{Payload, Registry};
pub use resolve::{Factory, Make};
