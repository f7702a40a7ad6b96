//! Textual representations of object trees.
//!
//! `Display` renders the canonical one-line form, e.g.
//! `Order(customer__name=Ada, id=7, total(self, tax))`: one descriptor per
//! leaf, nested names joined with the delimiter, sorted lexicographically.
//! [`MObject::to_tree`] renders the same data as an indented tree.

use std::fmt;

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Attr, MObject};

impl MObject {
    /// Sorted descriptors of every leaf attribute in this tree.
    pub fn descriptors(&self) -> Vec<String> {
        let settings = self.settings();
        let syntax = settings.syntax();
        self.iter()
            .flat_map(|(name, attr)| match attr {
                Attr::Node(child) => child
                    .descriptors()
                    .into_iter()
                    .map(|d| syntax.join(name, &d))
                    .collect(),
                Attr::Callable(c) => {
                    vec![format!("{name}({})", c.signature(&settings.self_param).join(", "))]
                }
                Attr::Scalar(s) => vec![format!("{name}={s}")],
            })
            .sorted()
            .collect()
    }

    /// Render as a tree rooted at the object's kind.
    pub fn to_tree(&self) -> Tree<String> {
        self.subtree(self.kind().to_string())
    }

    fn subtree(&self, label: String) -> Tree<String> {
        let self_param = &self.settings().self_param;
        let leaves = self.iter().map(|(name, attr)| match attr {
            Attr::Node(child) => child.subtree(name.to_string()),
            Attr::Callable(c) => Tree::new(format!("{name}({})", c.signature(self_param).join(", "))),
            Attr::Scalar(s) => Tree::new(format!("{name}={s}")),
        });
        Tree::new(label).with_leaves(leaves)
    }
}

impl fmt::Display for MObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.descriptors().join(", "))
    }
}
