//! Values accepted during construction and attributes stored on objects.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::callable::Callable;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::MObject;
use crate::domain::template::Template;

/// Opaque data stored on an object: compared and displayed as-is.
#[derive(Debug, Clone, Default)]
pub enum Scalar {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Scalar>),
    Map(BTreeMap<String, Scalar>),
}

impl Scalar {
    /// Short name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::None => "none",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "str",
            Scalar::List(_) => "list",
            Scalar::Map(_) => "map",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Scalar::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            Scalar::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Scalar::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Scalar>> {
        match self {
            Scalar::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Scalar>> {
        match self {
            Scalar::Map(v) => Some(v),
            _ => None,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(v) => write!(f, "{v:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::None, Scalar::None) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            (Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
                (*a as f64) == *b
            }
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::List(a), Scalar::List(b)) => a == b,
            (Scalar::Map(a), Scalar::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::None => write!(f, "None"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v:?}"),
            Scalar::Str(v) => write!(f, "{v}"),
            Scalar::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Scalar::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: ")?;
                    item.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v.into())
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }

            impl From<$ty> for Attr {
                fn from(v: $ty) -> Self {
                    Attr::Scalar(Scalar::from(v))
                }
            }

            impl PartialEq<$ty> for Scalar {
                fn eq(&self, other: &$ty) -> bool {
                    *self == Scalar::from(other.clone())
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
}

impl<T: Into<Scalar>> From<Vec<T>> for Scalar {
    fn from(items: Vec<T>) -> Self {
        Scalar::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::None)
    }
}

impl From<BTreeMap<String, Scalar>> for Scalar {
    fn from(entries: BTreeMap<String, Scalar>) -> Self {
        Scalar::Map(entries)
    }
}

/// Anything that can be declared for an attribute.
///
/// A [`Value::Template`] is only valid as input: it is replaced by a fresh
/// instance of the template when the value is stored.
#[derive(Debug, Clone)]
pub enum Value {
    Scalar(Scalar),
    Callable(Callable),
    Node(MObject),
    Template(Template),
}

impl Value {
    /// The unit value returned by callables with nothing to report.
    pub fn none() -> Self {
        Value::Scalar(Scalar::None)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(s) => s.type_name(),
            Value::Callable(_) => "callable",
            Value::Node(_) => "object",
            Value::Template(_) => "template",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&MObject> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_scalar(self) -> DomainResult<Scalar> {
        match self {
            Value::Scalar(s) => Ok(s),
            other => Err(DomainError::TypeMismatch {
                expected: "scalar",
                found: other.type_name(),
            }),
        }
    }

    pub fn to_int(&self) -> DomainResult<i64> {
        self.as_scalar()
            .and_then(Scalar::as_int)
            .ok_or_else(|| self.mismatch("int"))
    }

    pub fn to_float(&self) -> DomainResult<f64> {
        self.as_scalar()
            .and_then(Scalar::as_float)
            .ok_or_else(|| self.mismatch("float"))
    }

    pub fn to_str(&self) -> DomainResult<&str> {
        self.as_scalar()
            .and_then(Scalar::as_str)
            .ok_or_else(|| self.mismatch("str"))
    }

    fn mismatch(&self, expected: &'static str) -> DomainError {
        DomainError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Scalar(Scalar::from(items))
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

impl From<MObject> for Value {
    fn from(n: MObject) -> Self {
        Value::Node(n)
    }
}

impl From<Template> for Value {
    fn from(t: Template) -> Self {
        Value::Template(t)
    }
}

impl From<&Template> for Value {
    fn from(t: &Template) -> Self {
        Value::Template(t.clone())
    }
}

impl From<Attr> for Value {
    fn from(attr: Attr) -> Self {
        match attr {
            Attr::Scalar(s) => Value::Scalar(s),
            Attr::Callable(c) => Value::Callable(c),
            Attr::Node(n) => Value::Node(n),
        }
    }
}

/// An attribute as stored on an [`MObject`].
#[derive(Debug, Clone)]
pub enum Attr {
    Scalar(Scalar),
    Callable(Callable),
    Node(MObject),
}

impl Attr {
    pub fn is_callable(&self) -> bool {
        matches!(self, Attr::Callable(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Attr::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut Scalar> {
        match self {
            Attr::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Attr::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&MObject> {
        match self {
            Attr::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut MObject> {
        match self {
            Attr::Node(n) => Some(n),
            _ => None,
        }
    }
}

impl PartialEq for Attr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Attr::Scalar(a), Attr::Scalar(b)) => a == b,
            (Attr::Callable(a), Attr::Callable(b)) => a == b,
            (Attr::Node(a), Attr::Node(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Scalar> for Attr {
    fn from(s: Scalar) -> Self {
        Attr::Scalar(s)
    }
}
