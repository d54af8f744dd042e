//! Entity references (`kind:namespace/name`) and case-insensitive reference sets.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Namespace assumed when a reference omits one (`user:alice`).
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EntityRefParseError {
    #[error("entity reference is empty")]
    Empty,

    #[error("entity reference '{0}' has no kind (expected kind:namespace/name)")]
    MissingKind(String),

    #[error("entity reference '{0}' has an empty {1}")]
    EmptyPart(String, &'static str),
}

/// A parsed entity reference such as `group:default/guests`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityRef {
    kind: String,
    namespace: String,
    name: String,
}

impl EntityRef {
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased `kind:namespace/name`, the form used for membership comparisons.
    #[must_use]
    pub fn to_normalized_string(&self) -> String {
        normalize_ref(&self.to_string())
    }
}

impl FromStr for EntityRef {
    type Err = EntityRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EntityRefParseError::Empty);
        }

        let Some((kind, rest)) = s.split_once(':') else {
            return Err(EntityRefParseError::MissingKind(s.to_owned()));
        };
        let (namespace, name) = rest.split_once('/').unwrap_or((DEFAULT_NAMESPACE, rest));

        for (part, label) in [(kind, "kind"), (namespace, "namespace"), (name, "name")] {
            if part.is_empty() {
                return Err(EntityRefParseError::EmptyPart(s.to_owned(), label));
            }
        }

        Ok(Self {
            kind: kind.to_owned(),
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl TryFrom<String> for EntityRef {
    type Error = EntityRefParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityRef> for String {
    fn from(value: EntityRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Lowercases a raw reference string for comparison.
#[must_use]
pub fn normalize_ref(entity_ref: &str) -> String {
    entity_ref.trim().to_lowercase()
}

/// A set of lowercased entity references.
///
/// Built once (per request for requesters, once at load for configured groups)
/// so membership checks never re-normalize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRefs(HashSet<String>);

impl NormalizedRefs {
    #[must_use]
    pub fn contains(&self, entity_ref: &str) -> bool {
        self.0.contains(entity_ref)
    }

    /// Returns `true` if any reference appears in both sets.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small.iter().any(|r| large.contains(r))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for NormalizedRefs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|r| normalize_ref(r.as_ref())).collect())
    }
}
