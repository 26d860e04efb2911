//! Permission Set
//!
//! Tagged representation of a user's permission grant. The legacy wire
//! format is a plain list of tokens where the sentinel `"all"` meant
//! unrestricted access; that sentinel is folded into the `All` variant on
//! deserialization so call sites pattern-match instead of re-checking for
//! the magic string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

/// Wire sentinel for an unrestricted grant
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionSet {
    /// Unrestricted access (admin / master admin)
    All,
    /// Explicit grant of individual permission tokens
    Explicit(BTreeSet<String>),
}

impl Default for PermissionSet {
    fn default() -> Self {
        PermissionSet::Explicit(BTreeSet::new())
    }
}

impl PermissionSet {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = tokens.into_iter().map(Into::into).collect();
        if set.contains(ALL_SENTINEL) {
            PermissionSet::All
        } else {
            PermissionSet::Explicit(set)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PermissionSet::All)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PermissionSet::All => false,
            PermissionSet::Explicit(set) => set.is_empty(),
        }
    }

    /// Whether this grant covers `token`.
    ///
    /// Wildcard tokens of the form `orders:*` cover every permission in
    /// that module.
    pub fn allows(&self, token: &str) -> bool {
        match self {
            PermissionSet::All => true,
            PermissionSet::Explicit(set) => {
                set.contains(token)
                    || set.iter().any(|p| {
                        p.strip_suffix(":*")
                            .is_some_and(|prefix| token.starts_with(&format!("{}:", prefix)))
                    })
            }
        }
    }

    /// Wire representation as a token list
    pub fn tokens(&self) -> Vec<String> {
        match self {
            PermissionSet::All => vec![ALL_SENTINEL.to_string()],
            PermissionSet::Explicit(set) => set.iter().cloned().collect(),
        }
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        match self {
            PermissionSet::All => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(ALL_SENTINEL)?;
                seq.end()
            }
            PermissionSet::Explicit(set) => {
                let mut seq = serializer.serialize_seq(Some(set.len()))?;
                for token in set {
                    seq.serialize_element(token)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // null is normalized to the empty explicit set
        let tokens = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(PermissionSet::from_tokens(tokens))
    }
}
