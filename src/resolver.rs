//! Localized value resolution.
//!
//! A read for `(attribute, locale)` is answered, in order, from:
//!
//! 1. the entity's attribute cache, once the entry passes the staleness check
//!    against the live localization records;
//! 2. the localization record for the requested locale (found, never built);
//! 3. the fallback locale, when the value is blank and a fallback is set;
//!    fallback rules are evaluated only for blank values, and a cached value
//!    taken from a fallback is reused only while the read's fallback still
//!    leads to the same locale;
//! 4. the primary locale, when no fallback is set at all.
//!
//! The result is always a string; an empty string means no locale in the
//! chain had a value.

use crate::cache::CachedValue;
use crate::config::{CacheMode, LocalizationConfig};
use crate::entity::LocalizedEntity;
use crate::error::Result;
use crate::locale::{FallbackContext, FallbackLocale, Locale, LocaleId};
use crate::store::{is_blank, LocalizationBackend, LocalizationSet, OwnerId};
use std::sync::Arc;
use tracing::debug;

/// Which fallback a read should use.
#[derive(Debug, Clone, Default)]
pub enum FallbackChoice {
    /// Whatever the configuration specifies
    #[default]
    Configured,
    /// This fallback, regardless of configuration
    Explicit(FallbackLocale),
    /// No fallback locale; the primary-locale safety net still applies
    Disabled,
}

/// Per-read overrides.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    locale: Option<Locale>,
    fallback: FallbackChoice,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this locale instead of the current one.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn fallback(mut self, fallback: impl Into<FallbackLocale>) -> Self {
        self.fallback = FallbackChoice::Explicit(fallback.into());
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback = FallbackChoice::Disabled;
        self
    }
}

/// Resolves and updates translatable attribute values on an entity.
#[derive(Debug, Clone, Copy)]
pub struct LocalizedValueResolver<'c> {
    config: &'c LocalizationConfig,
}

impl<'c> LocalizedValueResolver<'c> {
    pub fn new(config: &'c LocalizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'c LocalizationConfig {
        self.config
    }

    /// Read `attribute` in the current locale with the configured fallback.
    pub fn read<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
    ) -> Result<String> {
        self.read_with(entity, attribute, ReadOptions::default())
    }

    /// Read `attribute` in `locale` with the configured fallback.
    pub fn read_in<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
        locale: &Locale,
    ) -> Result<String> {
        self.read_with(entity, attribute, ReadOptions::new().locale(locale.clone()))
    }

    pub fn read_with<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
        options: ReadOptions,
    ) -> Result<String> {
        entity.schema().ensure_attribute(attribute)?;

        let locale = match options.locale {
            Some(locale) => locale,
            None => self.config.directory.current_locale()?,
        };
        let fallback = match options.fallback {
            FallbackChoice::Configured => self.config.fallback_locale.clone(),
            FallbackChoice::Explicit(fallback) => Some(fallback),
            FallbackChoice::Disabled => None,
        };

        let (value, _) = self.resolve(entity, attribute, &locale, fallback.as_ref())?;

        if fallback.is_some() || !is_blank(&value) {
            return Ok(value);
        }

        let primary = self.config.directory.primary_locale()?;
        if primary == locale {
            return Ok(value);
        }

        debug!(
            attribute,
            locale = %locale,
            primary = %primary,
            "No localized value, reading primary locale"
        );
        self.config.metrics().record_fallback_lookup();
        let (value, _) = self.resolve(entity, attribute, &primary, None)?;
        Ok(value)
    }

    /// Returns the value and the locale whose record supplied it.
    ///
    /// The fallback applies once: the fallback locale is read without a
    /// fallback of its own, so a cached value is either direct or exactly one
    /// hop away from the requested locale.
    fn resolve<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
        locale: &Locale,
        fallback: Option<&FallbackLocale>,
    ) -> Result<(String, LocaleId)> {
        let metrics = self.config.metrics();
        let owner = entity.owner();
        let (localizations, cache) = entity.parts_mut()?;

        // Fallback target, evaluated at most once per call.
        let mut target = None;

        if let Some(entry) = cache.get(attribute, locale.id()).cloned() {
            if entry.is_stale(attribute, locale.id(), localizations) {
                debug!(attribute, locale = %locale, "Evicting stale cached value");
                cache.clear(attribute, locale.id());
                metrics.record_stale_eviction();
            } else if entry.source() == locale.id() {
                // A blank hit may still be answered by this read's fallback.
                if fallback.is_none() || !is_blank(entry.value()) {
                    metrics.record_cache_hit();
                    return Ok(entry.into_parts());
                }
            } else if let Some(fallback) = fallback {
                // Derived entries only answer reads whose fallback leads to the same source.
                let resolved = self.fallback_target(owner, localizations, fallback)?;
                if resolved.id() == entry.source() {
                    metrics.record_cache_hit();
                    return Ok(entry.into_parts());
                }
                debug!(
                    attribute,
                    locale = %locale,
                    fallback = %resolved,
                    "Cached value came from another fallback locale"
                );
                target = Some(resolved);
            }
        }
        metrics.record_cache_miss();

        let value = localizations
            .find(locale.id())
            .map(|record| record.value(attribute).to_string())
            .unwrap_or_default();

        let (value, source) = match fallback {
            Some(fallback) if is_blank(&value) => {
                let target = match target {
                    Some(target) => target,
                    None => self.fallback_target(owner, localizations, fallback)?,
                };

                if target == *locale {
                    (value, locale.id())
                } else {
                    debug!(
                        attribute,
                        locale = %locale,
                        fallback = %target,
                        "Blank localized value, reading fallback locale"
                    );
                    metrics.record_fallback_lookup();
                    self.resolve(entity, attribute, &target, None)?
                }
            }
            _ => (value, locale.id()),
        };

        if self.config.cache_mode == CacheMode::Tracked {
            entity
                .cache_mut()
                .set(attribute, locale.id(), CachedValue::new(value.clone(), source));
        }
        Ok((value, source))
    }

    fn fallback_target(
        &self,
        owner: OwnerId,
        localizations: &LocalizationSet,
        fallback: &FallbackLocale,
    ) -> Result<Locale> {
        if fallback.is_rule() {
            self.config.metrics().record_rule_evaluation();
        }
        fallback.resolve(&FallbackContext {
            owner,
            localizations,
        })
    }

    /// Write `attribute` in the current locale.
    pub fn write<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
        value: impl ToString,
    ) -> Result<()> {
        self.write_for(entity, attribute, value, None)
    }

    /// Write `attribute` in `locale` (or the current locale), building the
    /// localization record if it does not exist yet. Nothing is persisted.
    pub fn write_for<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
        value: impl ToString,
        locale: Option<&Locale>,
    ) -> Result<()> {
        entity.schema().ensure_attribute(attribute)?;

        let locale = match locale {
            Some(locale) => locale.clone(),
            None => self.config.directory.current_locale()?,
        };
        let value = value.to_string();

        let (localizations, cache) = entity.parts_mut()?;
        localizations
            .find_or_build(locale.id())
            .set(attribute, value.clone());

        // A blank write leaves nothing cached so the next read can fall back.
        if is_blank(&value) || self.config.cache_mode == CacheMode::Disabled {
            cache.clear(attribute, locale.id());
        } else {
            cache.set(attribute, locale.id(), CachedValue::new(value, locale.id()));
        }

        let evicted = cache.clear_derived(attribute);
        if evicted > 0 {
            debug!(attribute, evicted, "Dropped fallback-derived cache entries");
        }
        Ok(())
    }

    /// Clear every cached value on the entity.
    pub fn reset<B: LocalizationBackend>(&self, entity: &mut LocalizedEntity<B>) {
        entity.cache_mut().reset();
    }

    /// Clear the cached value for one attribute and locale.
    pub fn invalidate<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
        locale: &Locale,
    ) -> Result<()> {
        entity.schema().ensure_attribute(attribute)?;
        entity.cache_mut().clear(attribute, locale.id());
        Ok(())
    }

    /// Whether `attribute` in `locale` (or the current locale) differs from
    /// its persisted value. An entity without a record for the locale has no
    /// changes.
    pub fn attribute_changed<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
        attribute: &str,
        locale: Option<&Locale>,
    ) -> Result<bool> {
        entity.schema().ensure_attribute(attribute)?;
        let locale_id = match locale {
            Some(locale) => locale.id(),
            None => self.config.directory.current_locale()?.id(),
        };
        Ok(entity
            .localizations()?
            .find(locale_id)
            .is_some_and(|record| record.is_changed(attribute)))
    }

    /// Make sure every known locale has a localization record, then order the
    /// records like the directory. Returns how many records were built.
    pub fn build_missing<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
    ) -> Result<usize> {
        let order = self.config.directory.locale_ids()?;
        if order.is_empty() {
            return Ok(0);
        }

        let localizations = entity.localizations_mut()?;
        let mut built = 0;
        for locale_id in &order {
            if !localizations.contains(*locale_id) {
                localizations.find_or_build(*locale_id);
                built += 1;
            }
        }
        localizations.sort_by_locale_order(&order);

        if built > 0 {
            debug!(owner = %entity.owner(), built, "Built missing localizations");
        }
        Ok(built)
    }

    /// Drop unpersisted records whose translatable attributes are all blank.
    /// Returns how many were removed.
    pub fn reject_incomplete<B: LocalizationBackend>(
        &self,
        entity: &mut LocalizedEntity<B>,
    ) -> Result<usize> {
        let schema = Arc::clone(entity.schema());
        let removed = entity.localizations_mut()?.retain(|record| {
            record.is_persisted() || !record.is_blank(schema.attributes())
        });

        if removed > 0 {
            debug!(owner = %entity.owner(), removed, "Rejected empty localizations");
        }
        Ok(removed)
    }
}
