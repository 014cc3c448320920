use crate::locale::LocaleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Store-assigned identity of a persisted localization record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

/// One row of translated values for a single locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationRecord {
    id: Option<RecordId>,
    locale_id: LocaleId,
    values: BTreeMap<String, Option<String>>,

    /// Values as of the last load or persist, for change tracking
    #[serde(default, skip_serializing)]
    persisted_values: BTreeMap<String, Option<String>>,
}

impl LocalizationRecord {
    /// Build a new, unpersisted record for a locale.
    pub fn new(locale_id: LocaleId) -> Self {
        Self {
            id: None,
            locale_id,
            values: BTreeMap::new(),
            persisted_values: BTreeMap::new(),
        }
    }

    /// Set an attribute, builder style.
    pub fn with_value(mut self, attribute: &str, value: impl Into<String>) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn locale_id(&self) -> LocaleId {
        self.locale_id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Raw attribute value; `None` when never set or explicitly nulled.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).and_then(|value| value.as_deref())
    }

    /// Attribute value with nil coerced to the empty string.
    pub fn value(&self, attribute: &str) -> &str {
        self.get(attribute).unwrap_or("")
    }

    pub fn set(&mut self, attribute: &str, value: impl Into<String>) {
        self.values.insert(attribute.to_string(), Some(value.into()));
    }

    pub fn clear(&mut self, attribute: &str) {
        self.values.insert(attribute.to_string(), None);
    }

    /// True when every listed attribute is blank.
    pub fn is_blank<'a>(&self, attributes: impl IntoIterator<Item = &'a str>) -> bool {
        attributes
            .into_iter()
            .all(|attribute| is_blank(self.value(attribute)))
    }

    /// Whether `attribute` differs from its last persisted value.
    pub fn is_changed(&self, attribute: &str) -> bool {
        let current = self.values.get(attribute).cloned().flatten();
        let persisted = self.persisted_values.get(attribute).cloned().flatten();
        current != persisted
    }

    pub fn has_changes(&self) -> bool {
        !self.is_persisted() || self.values != self.persisted_values
    }

    /// Record the store id and snapshot the current values as clean.
    pub fn mark_persisted(&mut self, id: RecordId) {
        self.id = Some(id);
        self.persisted_values = self.values.clone();
    }
}

/// Blank: empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
