//! The owning entity: its localization records, attribute cache and backend.
//!
//! Localizations of an existing entity are loaded from the backend on first
//! access, so entities whose translations are never read never touch the
//! store. New entities start with an empty, already-loaded collection.

use crate::cache::AttributeCache;
use crate::config::LocalizationConfig;
use crate::error::{LocalizationError, Result};
use crate::schema::TranslatableSchema;
use crate::store::{LocalizationBackend, LocalizationSet, MemoryBackend, OwnerId};
use crate::validation::{self, ValidationReport};
use std::sync::Arc;
use tracing::{debug, warn};

/// A host record carrying translatable attributes.
#[derive(Debug)]
pub struct LocalizedEntity<B: LocalizationBackend = MemoryBackend> {
    owner: OwnerId,
    schema: Arc<TranslatableSchema>,
    backend: B,
    localizations: Option<LocalizationSet>,
    cache: AttributeCache,
}

impl<B: LocalizationBackend> LocalizedEntity<B> {
    /// A freshly created entity with no stored localizations yet.
    pub fn new(owner: OwnerId, schema: Arc<TranslatableSchema>, backend: B) -> Self {
        Self {
            owner,
            schema,
            backend,
            localizations: Some(LocalizationSet::default()),
            cache: AttributeCache::new(),
        }
    }

    /// An entity whose localizations live in `backend` and load on first use.
    pub fn existing(owner: OwnerId, schema: Arc<TranslatableSchema>, backend: B) -> Self {
        Self {
            owner,
            schema,
            backend,
            localizations: None,
            cache: AttributeCache::new(),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn schema(&self) -> &Arc<TranslatableSchema> {
        &self.schema
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &AttributeCache {
        &self.cache
    }

    pub(crate) fn cache_mut(&mut self) -> &mut AttributeCache {
        &mut self.cache
    }

    pub fn is_loaded(&self) -> bool {
        self.localizations.is_some()
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.localizations.is_none() {
            let records = self.backend.load(self.owner)?;
            self.localizations = Some(LocalizationSet::new(records));
        }
        Ok(())
    }

    /// The localization collection, loading it if needed.
    pub fn localizations(&mut self) -> Result<&LocalizationSet> {
        Ok(&*self.localizations_mut()?)
    }

    /// Mutable access to the collection. Edits made here bypass the resolver;
    /// the cache's staleness check picks them up on the next read.
    pub fn localizations_mut(&mut self) -> Result<&mut LocalizationSet> {
        self.ensure_loaded()?;
        Ok(self
            .localizations
            .get_or_insert_with(LocalizationSet::default))
    }

    /// Loaded collection and cache, borrowed together.
    pub(crate) fn parts_mut(&mut self) -> Result<(&mut LocalizationSet, &mut AttributeCache)> {
        self.ensure_loaded()?;
        let localizations = self
            .localizations
            .get_or_insert_with(LocalizationSet::default);
        Ok((localizations, &mut self.cache))
    }

    /// Build missing localizations if the schema asks for it on initialization.
    pub fn initialize(&mut self, config: &LocalizationConfig) -> Result<()> {
        if self.schema.options().initialize {
            config.resolver().build_missing(self)?;
        }
        Ok(())
    }

    /// Discard loaded localizations and cached values, then fetch from the backend.
    pub fn reload(&mut self) -> Result<()> {
        let records = self.backend.load(self.owner)?;
        self.localizations = Some(LocalizationSet::new(records));
        self.cache.reset();
        debug!("Reloaded localizations for owner {}", self.owner);
        Ok(())
    }

    pub fn validate(&mut self, config: &LocalizationConfig) -> Result<ValidationReport> {
        validation::validate(self, config)
    }

    /// Clean up, validate and persist the localizations.
    ///
    /// Blank placeholder records are dropped both before validation and
    /// before persisting, so only localizations with content reach the store.
    pub fn save(&mut self, config: &LocalizationConfig) -> Result<()> {
        let resolver = config.resolver();
        resolver.reject_incomplete(self)?;
        resolver.build_missing(self)?;

        let report = self.validate(config)?;
        if report.has_errors() {
            warn!(
                "Refusing to save {} {}: {}",
                self.schema.entity_name(),
                self.owner,
                report
            );
            return Err(LocalizationError::Invalid(report));
        }

        resolver.reject_incomplete(self)?;

        self.ensure_loaded()?;
        let localizations = self
            .localizations
            .get_or_insert_with(LocalizationSet::default);
        self.backend
            .persist(self.owner, localizations.as_mut_slice())?;

        debug!(
            "Saved {} localizations for {} {}",
            localizations.len(),
            self.schema.entity_name(),
            self.owner
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::locale::{Locale, LocaleDirectory, LocaleId};
    use crate::schema::TableOptions;
    use crate::store::LocalizationRecord;

    struct FailingBackend;

    impl LocalizationBackend for FailingBackend {
        fn load(&self, _owner: OwnerId) -> std::result::Result<Vec<LocalizationRecord>, StoreError> {
            Err(StoreError::Backend("connection refused".into()))
        }

        fn persist(
            &self,
            _owner: OwnerId,
            _records: &mut [LocalizationRecord],
        ) -> std::result::Result<(), StoreError> {
            Err(StoreError::Backend("read-only".into()))
        }
    }

    fn english() -> Locale {
        Locale::new(1, "en", "English")
    }

    fn french() -> Locale {
        Locale::new(2, "fr", "French")
    }

    fn config() -> LocalizationConfig {
        LocalizationConfig::new(LocaleDirectory::new(english(), vec![english(), french()]))
    }

    fn schema(options: TableOptions) -> Arc<TranslatableSchema> {
        Arc::new(TranslatableSchema::new("Article", ["name", "description"]).with_options(options))
    }

    // ==================== Loading Tests ====================

    #[test]
    fn test_new_entity_does_not_hit_backend() {
        let mut entity = LocalizedEntity::new(OwnerId(1), schema(TableOptions::default()), FailingBackend);
        assert!(entity.is_loaded());
        assert!(entity.localizations().unwrap().is_empty());
    }

    #[test]
    fn test_existing_entity_loads_lazily() {
        let backend = MemoryBackend::new();
        backend
            .insert(OwnerId(1), LocalizationRecord::new(LocaleId(1)).with_value("name", "Test"))
            .unwrap();

        let mut entity = LocalizedEntity::existing(OwnerId(1), schema(TableOptions::default()), backend);
        assert!(!entity.is_loaded());
        assert_eq!(entity.localizations().unwrap().len(), 1);
        assert!(entity.is_loaded());
    }

    #[test]
    fn test_load_failure_propagates() {
        let mut entity =
            LocalizedEntity::existing(OwnerId(1), schema(TableOptions::default()), FailingBackend);
        let err = entity.localizations().unwrap_err();
        assert!(matches!(err, LocalizationError::Store(StoreError::Backend(_))));
    }

    // ==================== Lifecycle Tests ====================

    #[test]
    fn test_initialize_builds_missing_localizations() {
        let config = config();
        let mut entity =
            LocalizedEntity::new(OwnerId(1), schema(TableOptions::default()), MemoryBackend::new());
        entity.initialize(&config).unwrap();
        assert_eq!(
            entity.localizations().unwrap().locale_ids(),
            vec![LocaleId(1), LocaleId(2)]
        );
    }

    #[test]
    fn test_initialize_respects_option() {
        let config = config();
        let mut entity = LocalizedEntity::new(
            OwnerId(1),
            schema(TableOptions::default().initialize(false)),
            MemoryBackend::new(),
        );
        entity.initialize(&config).unwrap();
        assert!(entity.localizations().unwrap().is_empty());
    }

    #[test]
    fn test_save_persists_only_filled_localizations() {
        let config = config();
        let backend = MemoryBackend::new();
        let mut entity =
            LocalizedEntity::new(OwnerId(1), schema(TableOptions::default()), backend.clone());
        entity.initialize(&config).unwrap();
        config.resolver().write(&mut entity, "name", "Test").unwrap();

        entity.save(&config).unwrap();

        assert_eq!(backend.count(OwnerId(1)).unwrap(), 1);
        let localizations = entity.localizations().unwrap();
        assert_eq!(localizations.len(), 1);
        assert!(localizations.iter().all(|record| record.is_persisted()));
    }

    #[test]
    fn test_save_rejects_invalid_entity() {
        let config = config();
        let backend = MemoryBackend::new();
        let mut entity = LocalizedEntity::new(
            OwnerId(1),
            schema(TableOptions::default().required(true)),
            backend.clone(),
        );

        let err = entity.save(&config).unwrap_err();
        assert!(matches!(err, LocalizationError::Invalid(_)));
        assert_eq!(backend.count(OwnerId(1)).unwrap(), 0);
    }

    #[test]
    fn test_save_failure_propagates() {
        let config = config();
        let mut entity =
            LocalizedEntity::new(OwnerId(1), schema(TableOptions::default()), FailingBackend);
        config.resolver().write(&mut entity, "name", "Test").unwrap();
        assert!(matches!(
            entity.save(&config),
            Err(LocalizationError::Store(StoreError::Backend(_)))
        ));
    }

    #[test]
    fn test_reload_picks_up_out_of_band_records_and_resets_cache() {
        let config = config();
        let backend = MemoryBackend::new();
        let mut entity =
            LocalizedEntity::new(OwnerId(1), schema(TableOptions::default()), backend.clone());
        config.resolver().write(&mut entity, "name", "Test").unwrap();
        entity.save(&config).unwrap();
        assert!(!entity.cache().is_empty());

        backend
            .insert(OwnerId(1), LocalizationRecord::new(LocaleId(2)).with_value("name", "Nom"))
            .unwrap();
        entity.reload().unwrap();

        assert!(entity.cache().is_empty());
        assert_eq!(entity.localizations().unwrap().len(), 2);
    }
}
