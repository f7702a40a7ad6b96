//! Tree builder: turns flat key/value declarations into object trees.

use std::collections::BTreeMap;
use std::iter;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::{Attr, DomainError, DomainResult, FlatKey, MObject, Template, Value};

/// Flat declarations grouped under one child name, keyed by their tails.
type Nested = BTreeMap<String, BTreeMap<String, Value>>;

/// Constructs object trees from flat declarations.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    settings: Arc<Settings>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::from_shared(Arc::new(settings))
    }

    pub(crate) fn from_shared(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build an object of the default kind from flat entries.
    pub fn build<I, K, V>(&self, entries: I) -> DomainResult<MObject>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.build_kind(self.settings.default_kind.clone(), entries)
    }

    /// Build an object reported as `kind` from flat entries.
    pub fn build_kind<I, K, V>(&self, kind: impl Into<String>, entries: I) -> DomainResult<MObject>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let entries = collect(BTreeMap::new(), entries);
        let mut node = MObject::with_settings(kind, Arc::clone(&self.settings));
        self.populate(&mut node, entries)?;
        Ok(node)
    }

    /// Build an instance of `template` with `overrides` applied last.
    ///
    /// The template defaults are cloned for every instance.
    pub fn instantiate<I, K, V>(&self, template: &Template, overrides: I) -> DomainResult<MObject>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let entries = collect(template.defaults().clone(), overrides);
        debug!(template = template.name(), entries = entries.len(), "instantiate");
        let mut node = MObject::with_settings(template.name(), Arc::clone(&self.settings));
        self.populate(&mut node, entries)?;
        Ok(node)
    }

    /// Turn a declared value into a stored attribute.
    ///
    /// Templates are instantiated without overrides; callables keep the
    /// binding they were declared with.
    pub(crate) fn classify(&self, value: Value) -> DomainResult<Attr> {
        match value {
            Value::Template(template) => self
                .instantiate(&template, iter::empty::<(String, Value)>())
                .map(Attr::Node),
            Value::Callable(callable) => Ok(Attr::Callable(callable)),
            Value::Node(node) => Ok(Attr::Node(node)),
            Value::Scalar(scalar) => Ok(Attr::Scalar(scalar)),
        }
    }

    /// Assign direct entries on `node`, then build or refine its children.
    #[instrument(level = "trace", skip(self, node, entries), fields(kind = %node.kind(), entries = entries.len()))]
    fn populate(&self, node: &mut MObject, entries: BTreeMap<String, Value>) -> DomainResult<()> {
        let syntax = self.settings.syntax();
        let mut nested = Nested::new();

        for (key, value) in entries {
            match syntax.split(&key) {
                FlatKey::Leaf(name) => {
                    let attr = self.classify(value)?;
                    node.insert(name, attr);
                }
                FlatKey::Nested { child, tail } => {
                    nested
                        .entry(child.to_string())
                        .or_default()
                        .insert(tail.to_string(), value);
                }
            }
        }

        for (name, group) in nested {
            debug!(child = %name, entries = group.len(), "nested group");
            match node.get_mut(&name) {
                None => {
                    let mut child =
                        MObject::with_settings(self.settings.default_kind.clone(), Arc::clone(&self.settings));
                    self.populate(&mut child, group)
                        .map_err(|e| e.within(&name, &self.settings.delimiter))?;
                    node.insert(name, Attr::Node(child));
                }
                Some(Attr::Node(existing)) => {
                    self.populate(existing, group)
                        .map_err(|e| e.within(&name, &self.settings.delimiter))?;
                }
                Some(_) => return Err(DomainError::NestingConflict { key: name }),
            }
        }
        Ok(())
    }
}

/// Insert `entries` over `base`; later keys replace earlier ones.
fn collect<I, K, V>(mut base: BTreeMap<String, Value>, entries: I) -> BTreeMap<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    for (key, value) in entries {
        base.insert(key.into(), value.into());
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scalar;

    #[test]
    fn test_conflict_names_nested_path() {
        let result = TreeBuilder::new().build([("a__b", 2), ("a__b__c", 3)]);
        assert_eq!(
            result.unwrap_err(),
            DomainError::NestingConflict { key: "a__b".into() }
        );
    }

    #[test]
    fn test_leaf_then_nested_on_same_name_conflicts() {
        let result = TreeBuilder::new().build([("a", 1), ("a__b", 2)]);
        assert_eq!(
            result.unwrap_err(),
            DomainError::NestingConflict { key: "a".into() }
        );
    }

    #[test]
    fn test_nested_entries_refine_prebuilt_child() {
        let child = MObject::build([("x", 1), ("y", 2)]).unwrap();
        let o = TreeBuilder::new()
            .build([("c", Value::from(child)), ("c__y", Value::from(5))])
            .unwrap();
        assert_eq!(o.int("c__x").unwrap(), 1);
        assert_eq!(o.int("c__y").unwrap(), 5);
    }

    #[test]
    fn test_later_duplicate_entry_wins() {
        let o = TreeBuilder::new().build([("a", 1), ("a", 2)]).unwrap();
        assert_eq!(*o.scalar("a").unwrap(), Scalar::Int(2));
    }

    #[test]
    fn test_custom_settings_drive_parsing() {
        let settings = Settings {
            delimiter: ".".into(),
            default_kind: "Stub".into(),
            ..Settings::default()
        };
        let o = TreeBuilder::with_settings(settings)
            .build([("a.b", 1), ("c__d", 2)])
            .unwrap();
        assert_eq!(o.kind(), "Stub");
        assert_eq!(o.int("a.b").unwrap(), 1);
        assert_eq!(o.int("c__d").unwrap(), 2);
        assert_eq!(o.child("a").unwrap().kind(), "Stub");
    }
}
