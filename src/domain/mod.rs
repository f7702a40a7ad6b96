//! Domain layer: the object tree and its building blocks
//!
//! This layer does no I/O; settings arrive already loaded.

pub mod callable;
pub mod error;
pub mod key;
pub mod node;
pub mod template;
pub mod value;

pub use callable::Callable;
pub use error::{DomainError, DomainResult};
pub use key::{FlatKey, KeySyntax};
pub use node::MObject;
pub use template::{Template, TemplateBuilder};
pub use value::{Attr, Scalar, Value};
