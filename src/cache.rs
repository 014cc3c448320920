//! Per-entity cache of resolved attribute values.
//!
//! Entries are keyed by `(attribute, requested locale id)` and remember which
//! locale's record actually supplied the value. That lets the staleness check
//! re-validate fallback-derived entries against the record they came from
//! instead of the (blank) record of the requested locale.

use crate::locale::LocaleId;
use crate::store::{is_blank, LocalizationSet};
use std::collections::HashMap;

/// A resolved value and the locale whose record supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    value: String,
    source: LocaleId,
}

impl CachedValue {
    pub fn new(value: impl Into<String>, source: LocaleId) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> LocaleId {
        self.source
    }

    pub fn into_parts(self) -> (String, LocaleId) {
        (self.value, self.source)
    }

    /// Whether the live records no longer agree with this entry.
    ///
    /// A direct entry is stale when the requested locale's record holds a
    /// different value. A fallback-derived entry is stale when the requested
    /// locale's record has gained a value of its own, or when the source
    /// record's value has moved on. Fallback is a single hop, so these two
    /// records are the only inputs to a derived value. Whether the read's
    /// fallback still leads to `source` is checked by the resolver.
    pub fn is_stale(
        &self,
        attribute: &str,
        requested: LocaleId,
        localizations: &LocalizationSet,
    ) -> bool {
        let requested_value = localizations
            .find(requested)
            .map(|record| record.value(attribute));

        if self.source == requested {
            return requested_value.is_some_and(|live| live != self.value);
        }

        if requested_value.is_some_and(|live| !is_blank(live)) {
            return true;
        }

        match localizations.find(self.source) {
            Some(record) => record.value(attribute) != self.value,
            None => !self.value.is_empty(),
        }
    }
}

/// `(attribute, locale id) -> CachedValue`, owned by a single entity.
#[derive(Debug, Clone, Default)]
pub struct AttributeCache {
    entries: HashMap<String, HashMap<LocaleId, CachedValue>>,
}

impl AttributeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: &str, locale_id: LocaleId) -> Option<&CachedValue> {
        self.entries
            .get(attribute)
            .and_then(|by_locale| by_locale.get(&locale_id))
    }

    pub fn set(&mut self, attribute: &str, locale_id: LocaleId, value: CachedValue) {
        self.entries
            .entry(attribute.to_string())
            .or_default()
            .insert(locale_id, value);
    }

    pub fn clear(&mut self, attribute: &str, locale_id: LocaleId) -> Option<CachedValue> {
        self.entries
            .get_mut(attribute)
            .and_then(|by_locale| by_locale.remove(&locale_id))
    }

    /// Drop every entry for `attribute` that was filled from another locale.
    pub fn clear_derived(&mut self, attribute: &str) -> usize {
        match self.entries.get_mut(attribute) {
            Some(by_locale) => {
                let before = by_locale.len();
                by_locale.retain(|locale_id, cached| cached.source == *locale_id);
                before - by_locale.len()
            }
            None => 0,
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
