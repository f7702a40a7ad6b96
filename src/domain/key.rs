//! Flat key parsing.
//!
//! A flat key encodes a path into an object tree: `b__c` names attribute `c`
//! of the child object `b`. Leading prefix characters (`_a`, `__a`) mark
//! private names and are kept verbatim, they never count as a delimiter.

/// Result of splitting one flat key at its first delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatKey<'k> {
    /// The key names an attribute of the current object.
    Leaf(&'k str),
    /// The key descends into `child`; `tail` is resolved by the child.
    Nested { child: &'k str, tail: &'k str },
}

/// Prefix character and delimiter used to split flat keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySyntax<'a> {
    pub prefix: char,
    pub delimiter: &'a str,
}

impl Default for KeySyntax<'static> {
    fn default() -> Self {
        Self {
            prefix: '_',
            delimiter: "__",
        }
    }
}

impl KeySyntax<'_> {
    /// Split `key` into a leaf name or a child name plus remaining tail.
    ///
    /// The maximal run of prefix characters is skipped before searching for
    /// the delimiter and re-attached to whichever segment it precedes.
    pub fn split<'k>(&self, key: &'k str) -> FlatKey<'k> {
        if self.delimiter.is_empty() {
            return FlatKey::Leaf(key);
        }
        let rest = key.trim_start_matches(self.prefix);
        let prefix_len = key.len() - rest.len();
        match rest.find(self.delimiter) {
            None => FlatKey::Leaf(key),
            Some(pos) => FlatKey::Nested {
                child: &key[..prefix_len + pos],
                tail: &rest[pos + self.delimiter.len()..],
            },
        }
    }

    /// Fully decompose `key` into its object path and leaf name.
    pub fn segments<'k>(&self, key: &'k str) -> (Vec<&'k str>, &'k str) {
        let mut path = Vec::new();
        let mut current = key;
        loop {
            match self.split(current) {
                FlatKey::Leaf(leaf) => return (path, leaf),
                FlatKey::Nested { child, tail } => {
                    path.push(child);
                    current = tail;
                }
            }
        }
    }

    /// Inverse of [`KeySyntax::split`] for one level.
    pub fn join(&self, parent: &str, child: &str) -> String {
        format!("{parent}{}{child}", self.delimiter)
    }
}
