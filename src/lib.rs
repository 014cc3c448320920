//! Per-locale localization records for host entities.
//!
//! An entity (an article, a product, ...) owns one localization record per
//! locale holding its translatable attributes. This crate resolves those
//! attributes for a requested locale, applies fallback and primary-locale
//! rules, and keeps a per-entity cache that re-validates itself against the
//! live records.
//!
//! # Architecture
//!
//! - `locale`: locale identities, the locale directory and fallback locales
//! - `store`: localization records, the per-entity collection and storage backends
//! - `schema`: translatable attribute registration and table options
//! - `entity`: the owning entity, its lazy-loaded localizations and save lifecycle
//! - `cache`: the per-entity attribute value cache and its staleness check
//! - `resolver`: reads, writes and store synchronization
//! - `validation`: presence rules for required attributes
//! - `config`: explicit configuration with scoped overrides
//! - `metrics`: resolver counters
//!
//! # Example
//!
//! ```rust
//! use localization_table::{
//!     LocaleDirectory, Locale, LocalizationConfig, LocalizedEntity, MemoryBackend, OwnerId,
//!     TranslatableSchema,
//! };
//! use std::sync::Arc;
//!
//! let english = Locale::new(1, "en", "English");
//! let french = Locale::new(2, "fr", "French");
//! let config = LocalizationConfig::new(LocaleDirectory::new(
//!     english.clone(),
//!     vec![english.clone(), french.clone()],
//! ));
//!
//! let schema = Arc::new(TranslatableSchema::new("Article", ["name", "description"]));
//! let mut article = LocalizedEntity::new(OwnerId(1), schema, MemoryBackend::new());
//!
//! let resolver = config.resolver();
//! resolver.write(&mut article, "name", "Test")?;
//!
//! // No French value yet: the primary locale answers.
//! assert_eq!(resolver.read_in(&mut article, "name", &french)?, "Test");
//! # Ok::<(), localization_table::LocalizationError>(())
//! ```

pub mod cache;
pub mod config;
pub mod entity;
pub mod error;
pub mod locale;
pub mod metrics;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod validation;

pub use config::{CacheMode, ConfigOverrides, LocalizationConfig};
pub use entity::LocalizedEntity;
pub use error::{LocalizationError, RuleError, StoreError};
pub use locale::{Deferred, FallbackContext, FallbackLocale, Locale, LocaleDirectory, LocaleId};
pub use metrics::{MetricsReport, ResolverMetrics};
pub use resolver::{FallbackChoice, LocalizedValueResolver, ReadOptions};
pub use schema::{AttributeAccessor, TableOptions, TranslatableSchema};
pub use store::{
    LocalizationBackend, LocalizationRecord, LocalizationSet, MemoryBackend, OwnerId, RecordId,
};
pub use validation::ValidationReport;
