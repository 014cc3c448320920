//! Error types for localization lookups, store access and validation.

use crate::validation::ValidationReport;
use thiserror::Error;

/// Error raised by a deferred locale rule (current locale, fallback, ...).
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the resolver and the localized entity.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// The attribute is not part of the entity's translatable set.
    #[error("unknown localized attribute `{0}`")]
    UnknownAttribute(String),

    /// A deferred locale rule failed while being evaluated.
    #[error("locale rule failed: {0}")]
    Rule(#[source] RuleError),

    /// The storage backend failed to load or persist localizations.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Validation rejected the entity before it was persisted.
    #[error("localization validation failed: {0}")]
    Invalid(ValidationReport),
}

/// Errors from a [`LocalizationBackend`](crate::store::LocalizationBackend).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("localization store lock poisoned")]
    Poisoned,

    #[error("localization store failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = LocalizationError> = std::result::Result<T, E>;
