//! Permission name patterns.

use regex::Regex;

use super::error::PolicyConfigError;

/// One configured permission pattern, compiled at load time.
///
/// Matching is case-sensitive.
#[derive(Debug, Clone)]
pub enum PermissionPattern {
    Exact(String),
    /// `*` matches any run of characters, including dots and nothing.
    Wildcard { raw: String, regex: Regex },
}

impl PermissionPattern {
    /// Compile a pattern. `field` names the config list it came from.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyConfigError::InvalidPattern`] for empty or
    /// whitespace-containing patterns.
    pub fn parse(field: &str, raw: &str) -> Result<Self, PolicyConfigError> {
        let invalid = |reason: String| PolicyConfigError::InvalidPattern {
            field: field.to_owned(),
            pattern: raw.to_owned(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("pattern is empty".to_owned()));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid("pattern contains whitespace".to_owned()));
        }
        if !raw.contains('*') {
            return Ok(Self::Exact(raw.to_owned()));
        }

        let body = regex::escape(raw).replace(r"\*", ".*");
        let regex = Regex::new(&format!("^{body}$")).map_err(|e| invalid(e.to_string()))?;
        Ok(Self::Wildcard {
            raw: raw.to_owned(),
            regex,
        })
    }

    #[must_use]
    pub fn matches(&self, permission: &str) -> bool {
        match self {
            Self::Exact(name) => name == permission,
            Self::Wildcard { regex, .. } => regex.is_match(permission),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(name) => name,
            Self::Wildcard { raw, .. } => raw,
        }
    }
}

/// An ordered list of patterns; a permission matches if any pattern does.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    patterns: Vec<PermissionPattern>,
}

impl PermissionSet {
    /// Compile every pattern of a config list.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyConfigError::InvalidPattern`].
    pub fn compile<S: AsRef<str>>(field: &str, raw: &[S]) -> Result<Self, PolicyConfigError> {
        let patterns = raw
            .iter()
            .map(|p| PermissionPattern::parse(field, p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The first pattern matching `permission`, if any.
    #[must_use]
    pub fn matching(&self, permission: &str) -> Option<&PermissionPattern> {
        self.patterns.iter().find(|p| p.matches(permission))
    }

    #[must_use]
    pub fn matches(&self, permission: &str) -> bool {
        self.matching(permission).is_some()
    }

    /// A read permission: the name contains `.read`, or it is in this set.
    #[must_use]
    pub fn allows_read(&self, permission: &str) -> bool {
        permission.contains(".read") || self.matches(permission)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
