use super::LocalizationRecord;
use crate::locale::LocaleId;
use serde::{Deserialize, Serialize};

/// Ordered localization records for one owning entity.
///
/// Lookups are linear scans by locale id; the collection holds one record per
/// locale, so it never grows beyond the number of known locales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizationSet {
    records: Vec<LocalizationRecord>,
}

impl LocalizationSet {
    pub fn new(records: Vec<LocalizationRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalizationRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LocalizationRecord> {
        self.records.iter_mut()
    }

    pub fn as_mut_slice(&mut self) -> &mut [LocalizationRecord] {
        &mut self.records
    }

    /// Locale ids in collection order.
    pub fn locale_ids(&self) -> Vec<LocaleId> {
        self.records.iter().map(LocalizationRecord::locale_id).collect()
    }

    pub fn find(&self, locale_id: LocaleId) -> Option<&LocalizationRecord> {
        self.records
            .iter()
            .find(|record| record.locale_id() == locale_id)
    }

    pub fn find_mut(&mut self, locale_id: LocaleId) -> Option<&mut LocalizationRecord> {
        self.records
            .iter_mut()
            .find(|record| record.locale_id() == locale_id)
    }

    pub fn contains(&self, locale_id: LocaleId) -> bool {
        self.find(locale_id).is_some()
    }

    /// Return the record for `locale_id`, building (not persisting) one if absent.
    pub fn find_or_build(&mut self, locale_id: LocaleId) -> &mut LocalizationRecord {
        let index = match self
            .records
            .iter()
            .position(|record| record.locale_id() == locale_id)
        {
            Some(index) => index,
            None => {
                self.records.push(LocalizationRecord::new(locale_id));
                self.records.len() - 1
            }
        };
        &mut self.records[index]
    }

    /// Append a record as-is, e.g. one loaded from the store.
    pub fn push(&mut self, record: LocalizationRecord) {
        self.records.push(record);
    }

    /// Stable-sort records by their locale's position in `order`.
    ///
    /// Records for locales missing from `order` sort first, keeping their
    /// relative order.
    pub fn sort_by_locale_order(&mut self, order: &[LocaleId]) {
        self.records.sort_by_key(|record| {
            order
                .iter()
                .position(|locale_id| *locale_id == record.locale_id())
        });
    }

    /// Keep only the records for which `keep` returns true; returns how many were removed.
    pub fn retain(&mut self, keep: impl FnMut(&LocalizationRecord) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(keep);
        before - self.records.len()
    }
}

impl<'a> IntoIterator for &'a LocalizationSet {
    type Item = &'a LocalizationRecord;
    type IntoIter = std::slice::Iter<'a, LocalizationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
