//! Reusable object declarations with inheritable defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::iter;
use std::sync::Arc;

use tracing::debug;

use crate::builder::TreeBuilder;
use crate::domain::error::DomainResult;
use crate::domain::node::MObject;
use crate::domain::value::Value;

struct TemplateInner {
    name: String,
    ancestors: Vec<String>,
    defaults: BTreeMap<String, Value>,
}

/// A named blueprint of flat default declarations.
///
/// Templates are immutable once built and cheap to clone. Every instance
/// receives its own copy of the defaults, so mutating one instance never
/// affects another.
#[derive(Clone)]
pub struct Template {
    inner: Arc<TemplateInner>,
}

impl Template {
    pub fn builder(name: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder {
            name: name.into(),
            parents: Vec::new(),
            declarations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Names of all ancestors in the order their defaults were merged.
    pub fn ancestors(&self) -> &[String] {
        &self.inner.ancestors
    }

    /// The merged flat defaults, own declarations included.
    pub fn defaults(&self) -> &BTreeMap<String, Value> {
        &self.inner.defaults
    }

    pub fn default_for(&self, key: &str) -> Option<&Value> {
        self.inner.defaults.get(key)
    }

    /// Build an instance with `overrides` applied on top of the defaults.
    pub fn instantiate<I, K, V>(&self, overrides: I) -> DomainResult<MObject>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        TreeBuilder::new().instantiate(self, overrides)
    }

    /// Build an instance from the defaults alone.
    pub fn new_instance(&self) -> DomainResult<MObject> {
        self.instantiate(iter::empty::<(String, Value)>())
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.inner.name)
            .field("ancestors", &self.inner.ancestors)
            .field("keys", &self.inner.defaults.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects parents and declarations for a [`Template`].
pub struct TemplateBuilder {
    name: String,
    parents: Vec<Template>,
    declarations: Vec<(String, Value)>,
}

impl TemplateBuilder {
    /// Inherit the defaults of `parent`.
    ///
    /// With several parents the one added last wins for keys declared by
    /// more than one of them.
    pub fn extends(mut self, parent: &Template) -> Self {
        self.parents.push(parent.clone());
        self
    }

    /// Declare a default for flat `key`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declarations.push((key.into(), value.into()));
        self
    }

    /// Merge parents in declaration order, then this template's own
    /// declarations on top.
    pub fn build(self) -> Template {
        let mut ancestors: Vec<String> = Vec::new();
        let mut defaults = BTreeMap::new();

        for parent in &self.parents {
            for name in parent.ancestors().iter().map(String::as_str).chain([parent.name()]) {
                if !ancestors.iter().any(|a| a == name) {
                    ancestors.push(name.to_string());
                }
            }
            for (key, value) in parent.defaults() {
                defaults.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in self.declarations {
            defaults.insert(key, value);
        }
        debug!(
            name = %self.name,
            parents = self.parents.len(),
            keys = defaults.len(),
            "template built"
        );

        Template {
            inner: Arc::new(TemplateInner {
                name: self.name,
                ancestors,
                defaults,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::Scalar;

    #[test]
    fn test_own_declarations_override_parents() {
        let base = Template::builder("Base").set("a", 1).set("b", 2).build();
        let child = Template::builder("Child")
            .set("a", 4)
            .extends(&base)
            .set("c", 3)
            .build();

        assert!(matches!(child.default_for("a"), Some(Value::Scalar(Scalar::Int(4)))));
        assert!(matches!(child.default_for("b"), Some(Value::Scalar(Scalar::Int(2)))));
        assert_eq!(child.ancestors(), ["Base".to_string()]);
    }

    #[test]
    fn test_last_parent_wins() {
        let first = Template::builder("First").set("x", 1).build();
        let second = Template::builder("Second").set("x", 2).build();
        let both = Template::builder("Both")
            .extends(&first)
            .extends(&second)
            .build();

        assert!(matches!(both.default_for("x"), Some(Value::Scalar(Scalar::Int(2)))));
        assert_eq!(both.ancestors(), ["First".to_string(), "Second".to_string()]);
    }

    #[test]
    fn test_shared_ancestors_listed_once() {
        let root = Template::builder("Root").build();
        let left = Template::builder("Left").extends(&root).build();
        let right = Template::builder("Right").extends(&root).build();
        let diamond = Template::builder("Diamond")
            .extends(&left)
            .extends(&right)
            .build();

        assert_eq!(diamond.ancestors(), ["Root", "Left", "Right"].map(String::from));
    }
}
