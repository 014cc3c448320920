//! Localization store: records, the per-entity collection, and storage backends.

mod backend;
mod record;
mod set;

pub use backend::{LocalizationBackend, MemoryBackend};
pub use record::{is_blank, LocalizationRecord, RecordId};
pub use set::LocalizationSet;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the owning entity (e.g., an article's primary key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
