use super::{LocalizationRecord, OwnerId, RecordId};
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Durable storage for localization records.
///
/// The resolver never calls this directly: records are loaded lazily by the
/// owning entity and persisted when the entity is saved.
pub trait LocalizationBackend {
    /// Fetch every stored localization for `owner`, in storage order.
    fn load(&self, owner: OwnerId) -> Result<Vec<LocalizationRecord>, StoreError>;

    /// Store `records` for `owner`, assigning ids to new ones and marking
    /// every record as persisted.
    fn persist(&self, owner: OwnerId, records: &mut [LocalizationRecord])
        -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<OwnerId, Vec<LocalizationRecord>>,
    next_id: i64,
}

impl Tables {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId(self.next_id)
    }
}

/// In-process backend keyed by owner. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record directly, bypassing any entity (an out-of-band write).
    pub fn insert(
        &self,
        owner: OwnerId,
        mut record: LocalizationRecord,
    ) -> Result<RecordId, StoreError> {
        let mut tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        let id = tables.allocate_id();
        record.mark_persisted(id);
        tables.rows.entry(owner).or_default().push(record);
        Ok(id)
    }

    /// Number of stored records for `owner`.
    pub fn count(&self, owner: OwnerId) -> Result<usize, StoreError> {
        let tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.rows.get(&owner).map_or(0, Vec::len))
    }
}

impl LocalizationBackend for MemoryBackend {
    fn load(&self, owner: OwnerId) -> Result<Vec<LocalizationRecord>, StoreError> {
        let tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        let records = tables.rows.get(&owner).cloned().unwrap_or_default();
        debug!("Loaded {} localizations for owner {}", records.len(), owner);
        Ok(records)
    }

    fn persist(
        &self,
        owner: OwnerId,
        records: &mut [LocalizationRecord],
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;

        for record in records.iter_mut() {
            let id = match record.id() {
                Some(id) => id,
                None => tables.allocate_id(),
            };
            record.mark_persisted(id);

            let rows = tables.rows.entry(owner).or_default();
            match rows.iter_mut().find(|row| row.id() == Some(id)) {
                Some(row) => *row = record.clone(),
                None => rows.push(record.clone()),
            }
        }

        debug!("Persisted {} localizations for owner {}", records.len(), owner);
        Ok(())
    }
}
