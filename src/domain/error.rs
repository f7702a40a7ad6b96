//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the object tree rules.
///
/// Construction only ever fails with [`DomainError::NestingConflict`]; the
/// remaining variants come from accessing or invoking attributes afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid nesting structure, '{key}' is already defined as a simple value")]
    NestingConflict { key: String },

    #[error("unknown attribute: {key}")]
    UnknownAttribute { key: String },

    #[error("attribute is not an object: {key}")]
    NotANode { key: String },

    #[error("attribute is not callable: {key}")]
    NotCallable { key: String },

    #[error("attribute is not a scalar value: {key}")]
    NotAScalar { key: String },

    #[error("{name}() takes {expected} argument(s) but {given} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("call to {name}() failed: {message}")]
    Invocation { name: String, message: String },
}

impl DomainError {
    /// Prefix the key carried by a lookup error with the name of the object
    /// it was raised in, so errors from deep lookups report the full path.
    pub(crate) fn within(self, parent: &str, delimiter: &str) -> Self {
        let join = |key: String| format!("{parent}{delimiter}{key}");
        match self {
            Self::NestingConflict { key } => Self::NestingConflict { key: join(key) },
            Self::UnknownAttribute { key } => Self::UnknownAttribute { key: join(key) },
            Self::NotANode { key } => Self::NotANode { key: join(key) },
            Self::NotCallable { key } => Self::NotCallable { key: join(key) },
            Self::NotAScalar { key } => Self::NotAScalar { key: join(key) },
            other => other,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
