//! Locale type: an opaque identity with a display code and name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Numeric identity of a locale, as stored on each localization record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleId(pub i64);

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A language/region known to the locale directory.
///
/// Equality and hashing use the id only. The code and name are carried for
/// configuration and diagnostics and are never interpreted by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    id: LocaleId,
    code: String,
    name: String,
}

impl Locale {
    /// Create a locale.
    ///
    /// # Arguments
    /// * `id` - The identity stored on localization records
    /// * `code` - Short code (e.g., "en", "fr")
    /// * `name` - Display name (e.g., "English")
    pub fn new(id: i64, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: LocaleId(id),
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> LocaleId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Locale {}

impl Hash for Locale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.id)
    }
}
