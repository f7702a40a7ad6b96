//! Structural comparison of objects against arbitrary attribute holders.
//!
//! Two objects are compared by the *names* of their non-callable attributes
//! and by the values on names both sides share. The name sets decide the
//! relation (equal, subset, superset); the shared values must agree for any
//! relation to hold. Values are never ordered among themselves.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{instrument, trace};

use crate::domain::{Attr, MObject, Scalar};

/// One attribute as seen by the comparator.
pub enum Field<'a> {
    Value(Cow<'a, Scalar>),
    Object(&'a dyn Inspect),
    /// Callables take no part in comparisons.
    Callable,
}

impl<'a> Field<'a> {
    /// Owned scalar field.
    pub fn value(v: impl Into<Scalar>) -> Self {
        Field::Value(Cow::Owned(v.into()))
    }

    pub fn object(obj: &'a dyn Inspect) -> Self {
        Field::Object(obj)
    }
}

/// Read access to the attributes of something an [`MObject`] can be
/// compared with.
///
/// # Example
/// ```
/// use mobject::{Field, Inspect};
///
/// struct Point { x: i64, y: i64 }
///
/// impl Inspect for Point {
///     fn attribute_names(&self) -> Vec<String> {
///         vec!["x".into(), "y".into()]
///     }
///
///     fn attribute(&self, name: &str) -> Option<Field<'_>> {
///         match name {
///             "x" => Some(Field::value(self.x)),
///             "y" => Some(Field::value(self.y)),
///             _ => None,
///         }
///     }
/// }
///
/// let stub = mobject::mob!(x = 1).unwrap();
/// assert!(stub < Point { x: 1, y: 2 });
/// ```
pub trait Inspect {
    /// Names of all attributes; callables may be listed, they are skipped.
    fn attribute_names(&self) -> Vec<String>;

    fn attribute(&self, name: &str) -> Option<Field<'_>>;
}

/// Relation required between the attribute name sets of two objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetRelation {
    Equal,
    ProperSubset,
    Subset,
    ProperSuperset,
    Superset,
}

impl SetRelation {
    pub fn holds(self, ours: &BTreeSet<String>, theirs: &BTreeSet<String>) -> bool {
        match self {
            SetRelation::Equal => ours == theirs,
            SetRelation::ProperSubset => ours != theirs && ours.is_subset(theirs),
            SetRelation::Subset => ours.is_subset(theirs),
            SetRelation::ProperSuperset => ours != theirs && ours.is_superset(theirs),
            SetRelation::Superset => ours.is_superset(theirs),
        }
    }
}

impl Inspect for MObject {
    fn attribute_names(&self) -> Vec<String> {
        self.attribute_names().map(String::from).collect()
    }

    fn attribute(&self, name: &str) -> Option<Field<'_>> {
        self.get(name).map(|attr| match attr {
            Attr::Scalar(s) => Field::Value(Cow::Borrowed(s)),
            Attr::Node(n) => Field::Object(n),
            Attr::Callable(_) => Field::Callable,
        })
    }
}

impl Inspect for BTreeMap<String, Scalar> {
    fn attribute_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn attribute(&self, name: &str) -> Option<Field<'_>> {
        self.get(name).map(|s| Field::Value(Cow::Borrowed(s)))
    }
}

/// Attribute names that take part in comparisons.
fn comparable_names(obj: &dyn Inspect) -> BTreeSet<String> {
    obj.attribute_names()
        .into_iter()
        .filter(|name| matches!(obj.attribute(name), Some(Field::Value(_) | Field::Object(_))))
        .collect()
}

/// Whether every shared name holds equal values on both sides.
fn overlap_agrees(
    ours: &dyn Inspect,
    theirs: &dyn Inspect,
    our_names: &BTreeSet<String>,
    their_names: &BTreeSet<String>,
) -> bool {
    our_names.intersection(their_names).all(|name| {
        let agrees = match (ours.attribute(name), theirs.attribute(name)) {
            (Some(Field::Value(a)), Some(Field::Value(b))) => a == b,
            (Some(Field::Object(a)), Some(Field::Object(b))) => {
                structural_match(a, b, SetRelation::Equal)
            }
            _ => false,
        };
        if !agrees {
            trace!(name = %name, "values differ");
        }
        agrees
    })
}

/// Compare two attribute holders under `relation`.
#[instrument(level = "trace", skip(ours, theirs))]
pub fn structural_match(ours: &dyn Inspect, theirs: &dyn Inspect, relation: SetRelation) -> bool {
    let our_names = comparable_names(ours);
    let their_names = comparable_names(theirs);
    if !relation.holds(&our_names, &their_names) {
        trace!(?our_names, ?their_names, "name sets do not match");
        return false;
    }
    overlap_agrees(ours, theirs, &our_names, &their_names)
}

/// The relation of `ours` to `theirs` as an ordering, `None` if the shared
/// values disagree or neither name set contains the other.
pub fn structural_cmp(ours: &dyn Inspect, theirs: &dyn Inspect) -> Option<Ordering> {
    let our_names = comparable_names(ours);
    let their_names = comparable_names(theirs);
    let ordering = if our_names == their_names {
        Ordering::Equal
    } else if our_names.is_subset(&their_names) {
        Ordering::Less
    } else if our_names.is_superset(&their_names) {
        Ordering::Greater
    } else {
        return None;
    };
    overlap_agrees(ours, theirs, &our_names, &their_names).then_some(ordering)
}

impl MObject {
    /// Compare against `other` under an explicit set relation.
    pub fn matches(&self, other: &dyn Inspect, relation: SetRelation) -> bool {
        structural_match(self, other, relation)
    }

    pub fn is_subset_of(&self, other: &dyn Inspect) -> bool {
        self.matches(other, SetRelation::Subset)
    }

    pub fn is_proper_subset_of(&self, other: &dyn Inspect) -> bool {
        self.matches(other, SetRelation::ProperSubset)
    }

    pub fn is_superset_of(&self, other: &dyn Inspect) -> bool {
        self.matches(other, SetRelation::Superset)
    }

    pub fn is_proper_superset_of(&self, other: &dyn Inspect) -> bool {
        self.matches(other, SetRelation::ProperSuperset)
    }
}

impl<T: Inspect> PartialEq<T> for MObject {
    fn eq(&self, other: &T) -> bool {
        structural_match(self, other, SetRelation::Equal)
    }
}

impl<T: Inspect> PartialOrd<T> for MObject {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        structural_cmp(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(SetRelation::Equal, &["a"], &["a"], true)]
    #[case(SetRelation::Equal, &["a"], &["a", "b"], false)]
    #[case(SetRelation::ProperSubset, &["a"], &["a", "b"], true)]
    #[case(SetRelation::ProperSubset, &["a", "b"], &["a", "b"], false)]
    #[case(SetRelation::Subset, &["a", "b"], &["a", "b"], true)]
    #[case(SetRelation::Subset, &["c"], &["a", "b"], false)]
    #[case(SetRelation::ProperSuperset, &["a", "b"], &["a"], true)]
    #[case(SetRelation::ProperSuperset, &["a"], &["a"], false)]
    #[case(SetRelation::Superset, &["a"], &["a"], true)]
    #[case(SetRelation::Superset, &["a"], &["a", "b"], false)]
    fn test_set_relation(
        #[case] relation: SetRelation,
        #[case] ours: &[&str],
        #[case] theirs: &[&str],
        #[case] expected: bool,
    ) {
        assert_eq!(relation.holds(&names(ours), &names(theirs)), expected);
    }

    #[test]
    fn test_disjoint_names_are_unordered() {
        let a = crate::mob!(a = 1).unwrap();
        let b = crate::mob!(b = 1).unwrap();
        assert_eq!(a.partial_cmp(&b), None);
        assert!(a != b);
    }

    #[test]
    fn test_object_against_scalar_is_unequal() {
        let nested = crate::mob!(a__x = 1).unwrap();
        let flat = crate::mob!(a = 1).unwrap();
        assert!(nested != flat);
    }

    #[test]
    fn test_compare_with_map() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Scalar::from(1));
        map.insert("b".to_string(), Scalar::from("x"));

        assert!(crate::mob!(a = 1, b = "x").unwrap() == map);
        assert!(crate::mob!(a = 1).unwrap() < map);
        assert!(crate::mob!(a = 2).unwrap().partial_cmp(&map).is_none());
    }
}
