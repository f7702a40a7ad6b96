//! Behavior attached to objects.
//!
//! A callable is either a *method*, which receives the object it is stored on
//! as its first argument, or a plain *function*, which only ever sees the
//! arguments it is called with. The declared parameter names are kept for
//! display and arity checks.

use std::fmt;
use std::sync::Arc;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::MObject;
use crate::domain::value::Value;

type MethodFn = dyn Fn(&mut MObject, Vec<Value>) -> DomainResult<Value> + Send + Sync;
type FunctionFn = dyn Fn(Vec<Value>) -> DomainResult<Value> + Send + Sync;

#[derive(Clone)]
enum Binding {
    Method(Arc<MethodFn>),
    Function(Arc<FunctionFn>),
}

/// A method or plain function stored as an attribute.
#[derive(Clone)]
pub struct Callable {
    params: Vec<String>,
    binding: Binding,
}

impl Callable {
    /// Declare a method bound to whichever object stores it.
    ///
    /// `params` lists the parameters after the implicit self parameter.
    pub fn method<I, S, F>(params: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut MObject, Vec<Value>) -> DomainResult<Value> + Send + Sync + 'static,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            binding: Binding::Method(Arc::new(f)),
        }
    }

    /// Declare a plain function, called with exactly the given arguments.
    pub fn function<I, S, F>(params: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Vec<Value>) -> DomainResult<Value> + Send + Sync + 'static,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            binding: Binding::Function(Arc::new(f)),
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self.binding, Binding::Method(_))
    }

    /// Declared parameters, not counting the self parameter of methods.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Full parameter list as declared, with `self_param` leading for methods.
    pub fn signature<'a>(&'a self, self_param: &'a str) -> Vec<&'a str> {
        let receiver = self.is_method().then_some(self_param);
        receiver
            .into_iter()
            .chain(self.params.iter().map(String::as_str))
            .collect()
    }

    /// Invoke with `owner` as receiver; functions ignore it.
    pub(crate) fn invoke(
        &self,
        name: &str,
        owner: &mut MObject,
        args: Vec<Value>,
    ) -> DomainResult<Value> {
        if args.len() != self.params.len() {
            return Err(DomainError::ArityMismatch {
                name: name.to_string(),
                expected: self.params.len(),
                given: args.len(),
            });
        }
        match &self.binding {
            Binding::Method(f) => f(owner, args),
            Binding::Function(f) => f(args),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        let same_fn = match (&self.binding, &other.binding) {
            (Binding::Method(a), Binding::Method(b)) => Arc::ptr_eq(a, b),
            (Binding::Function(a), Binding::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_fn && self.params == other.params
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("params", &self.params)
            .field("method", &self.is_method())
            .finish()
    }
}
