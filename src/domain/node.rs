//! The object tree node.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::builder::TreeBuilder;
use crate::config::Settings;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::key::FlatKey;
use crate::domain::value::{Attr, Scalar, Value};

/// A generic object with dynamically assigned attributes.
///
/// Attributes are scalars, callables, or child objects. A parent owns its
/// children exclusively, so cloning an object deep-copies the whole tree
/// (callables are shared, they are immutable).
#[derive(Debug, Clone)]
pub struct MObject {
    kind: String,
    attrs: BTreeMap<String, Attr>,
    settings: Arc<Settings>,
}

impl Default for MObject {
    fn default() -> Self {
        Self::new()
    }
}

impl MObject {
    /// An empty object of the default kind.
    pub fn new() -> Self {
        let settings = Settings::default();
        Self::with_settings(settings.default_kind.clone(), Arc::new(settings))
    }

    pub(crate) fn with_settings(kind: impl Into<String>, settings: Arc<Settings>) -> Self {
        Self {
            kind: kind.into(),
            attrs: BTreeMap::new(),
            settings,
        }
    }

    /// Build an object tree from flat `(key, value)` pairs.
    ///
    /// Keys containing the delimiter (`a__b`) create nested objects. Later
    /// pairs win over earlier ones with the same key.
    ///
    /// # Errors
    /// [`DomainError::NestingConflict`] if a key is used both as a value and
    /// as an object, e.g. `a__b` together with `a__b__c`.
    pub fn build<I, K, V>(entries: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        TreeBuilder::new().build(entries)
    }

    /// Name of the template this object was built from.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Names of all direct attributes, callables included, in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attr)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Direct attribute lookup, the name is not parsed.
    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.attrs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attr> {
        self.attrs.get_mut(name)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, attr: Attr) -> Option<Attr> {
        self.attrs.insert(name.into(), attr)
    }

    /// Look up an attribute by flat key, `resolve("b__c")` reads `c` of child `b`.
    pub fn resolve(&self, key: &str) -> Option<&Attr> {
        self.lookup(key).ok()
    }

    pub fn resolve_mut(&mut self, key: &str) -> Option<&mut Attr> {
        self.lookup_mut(key).ok()
    }

    /// Like [`MObject::resolve`] but reports why the lookup failed.
    pub fn lookup(&self, key: &str) -> DomainResult<&Attr> {
        match self.settings.syntax().split(key) {
            FlatKey::Leaf(name) => self.attrs.get(name).ok_or_else(|| unknown(name)),
            FlatKey::Nested { child, tail } => self
                .direct_child(child)?
                .lookup(tail)
                .map_err(|e| e.within(child, &self.settings.delimiter)),
        }
    }

    pub fn lookup_mut(&mut self, key: &str) -> DomainResult<&mut Attr> {
        let settings = Arc::clone(&self.settings);
        match settings.syntax().split(key) {
            FlatKey::Leaf(name) => self.attrs.get_mut(name).ok_or_else(|| unknown(name)),
            FlatKey::Nested { child, tail } => self
                .direct_child_mut(child)?
                .lookup_mut(tail)
                .map_err(|e| e.within(child, &settings.delimiter)),
        }
    }

    /// Scalar attribute at `key`.
    pub fn scalar(&self, key: &str) -> DomainResult<&Scalar> {
        self.lookup(key)?.as_scalar().ok_or_else(|| not_scalar(key))
    }

    pub fn scalar_mut(&mut self, key: &str) -> DomainResult<&mut Scalar> {
        self.lookup_mut(key)?
            .as_scalar_mut()
            .ok_or_else(|| not_scalar(key))
    }

    /// Integer attribute at `key`.
    pub fn int(&self, key: &str) -> DomainResult<i64> {
        let scalar = self.scalar(key)?;
        scalar.as_int().ok_or(DomainError::TypeMismatch {
            expected: "int",
            found: scalar.type_name(),
        })
    }

    /// List attribute at `key`, for in-place mutation.
    pub fn list_mut(&mut self, key: &str) -> DomainResult<&mut Vec<Scalar>> {
        let scalar = self.scalar_mut(key)?;
        let found = scalar.type_name();
        scalar.as_list_mut().ok_or(DomainError::TypeMismatch {
            expected: "list",
            found,
        })
    }

    /// Child object at `key`.
    pub fn child(&self, key: &str) -> DomainResult<&MObject> {
        self.lookup(key)?.as_node().ok_or_else(|| not_node(key))
    }

    pub fn child_mut(&mut self, key: &str) -> DomainResult<&mut MObject> {
        self.lookup_mut(key)?
            .as_node_mut()
            .ok_or_else(|| not_node(key))
    }

    fn direct_child(&self, name: &str) -> DomainResult<&MObject> {
        match self.attrs.get(name) {
            Some(Attr::Node(node)) => Ok(node),
            Some(_) => Err(not_node(name)),
            None => Err(unknown(name)),
        }
    }

    fn direct_child_mut(&mut self, name: &str) -> DomainResult<&mut MObject> {
        match self.attrs.get_mut(name) {
            Some(Attr::Node(node)) => Ok(node),
            Some(_) => Err(not_node(name)),
            None => Err(unknown(name)),
        }
    }

    /// Assign `value` at flat `key`, classified the same way as during
    /// construction. Intermediate objects must already exist.
    ///
    /// Returns the attribute previously stored under that name.
    #[instrument(level = "trace", skip(self, value))]
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> DomainResult<Option<Attr>> {
        let settings = Arc::clone(&self.settings);
        match settings.syntax().split(key) {
            FlatKey::Leaf(name) => {
                let attr = TreeBuilder::from_shared(Arc::clone(&settings)).classify(value.into())?;
                Ok(self.insert(name, attr))
            }
            FlatKey::Nested { child, tail } => self
                .direct_child_mut(child)?
                .set(tail, value)
                .map_err(|e| e.within(child, &settings.delimiter)),
        }
    }

    /// Remove the attribute at flat `key`.
    pub fn remove(&mut self, key: &str) -> Option<Attr> {
        let settings = Arc::clone(&self.settings);
        match settings.syntax().split(key) {
            FlatKey::Leaf(name) => self.attrs.remove(name),
            FlatKey::Nested { child, tail } => self.direct_child_mut(child).ok()?.remove(tail),
        }
    }

    /// Call the callable at flat `key`.
    ///
    /// The call happens on the innermost object named by the key: a method
    /// stored at `b__set_c` receives child `b` as its receiver.
    ///
    /// # Errors
    /// Lookup errors, [`DomainError::NotCallable`], arity mismatches, and
    /// whatever the callable itself returns.
    #[instrument(level = "trace", skip(self, args), fields(kind = %self.kind, args = args.len()))]
    pub fn call(&mut self, key: &str, args: Vec<Value>) -> DomainResult<Value> {
        let settings = Arc::clone(&self.settings);
        match settings.syntax().split(key) {
            FlatKey::Leaf(name) => {
                let callable = match self.attrs.get(name) {
                    Some(Attr::Callable(c)) => c.clone(),
                    Some(_) => return Err(DomainError::NotCallable { key: name.into() }),
                    None => return Err(unknown(name)),
                };
                debug!(name, method = callable.is_method(), "invoking");
                callable.invoke(name, self, args)
            }
            FlatKey::Nested { child, tail } => self
                .direct_child_mut(child)?
                .call(tail, args)
                .map_err(|e| e.within(child, &settings.delimiter)),
        }
    }
}

fn unknown(name: &str) -> DomainError {
    DomainError::UnknownAttribute { key: name.into() }
}

fn not_node(key: &str) -> DomainError {
    DomainError::NotANode { key: key.into() }
}

fn not_scalar(key: &str) -> DomainError {
    DomainError::NotAScalar { key: key.into() }
}
