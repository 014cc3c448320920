use crate::locale::{Deferred, FallbackLocale, Locale, LocaleDirectory};
use crate::metrics::ResolverMetrics;
use crate::resolver::LocalizedValueResolver;
use anyhow::{bail, Context, Result};
use std::str::FromStr;
use std::sync::Arc;

/// Whether resolved values are cached per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Cache resolved values and re-validate them against live records
    #[default]
    Tracked,
    /// Resolve from the records on every read
    Disabled,
}

impl FromStr for CacheMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tracked" => Ok(CacheMode::Tracked),
            "disabled" | "off" => Ok(CacheMode::Disabled),
            other => bail!("Unknown cache mode: '{}'", other),
        }
    }
}

/// Everything the resolver needs to know about locales.
///
/// Passed by reference to every operation. Temporary changes go through
/// [`LocalizationConfig::with_options`], which works on a snapshot and leaves
/// the original untouched.
#[derive(Debug, Clone)]
pub struct LocalizationConfig {
    pub directory: LocaleDirectory,
    pub fallback_locale: Option<FallbackLocale>,
    pub cache_mode: CacheMode,
    metrics: Arc<ResolverMetrics>,
}

impl LocalizationConfig {
    pub fn new(directory: LocaleDirectory) -> Self {
        Self {
            directory,
            fallback_locale: None,
            cache_mode: CacheMode::default(),
            metrics: Arc::new(ResolverMetrics::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<FallbackLocale>) -> Self {
        self.fallback_locale = Some(fallback.into());
        self
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    /// Counters shared with every snapshot derived from this configuration.
    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    pub fn resolver(&self) -> LocalizedValueResolver<'_> {
        LocalizedValueResolver::new(self)
    }

    /// A copy of this configuration with `overrides` applied.
    pub fn overridden(&self, overrides: ConfigOverrides) -> Self {
        let mut config = self.clone();
        if let Some(primary) = overrides.primary_locale {
            config.directory = config.directory.with_primary(primary);
        }
        if let Some(current) = overrides.current_locale {
            config.directory = config.directory.with_current(current);
        }
        if let Some(all) = overrides.all_locales {
            config.directory = config.directory.with_all(all);
        }
        if let Some(fallback) = overrides.fallback_locale {
            config.fallback_locale = fallback;
        }
        if let Some(cache_mode) = overrides.cache_mode {
            config.cache_mode = cache_mode;
        }
        config
    }

    /// Run `scope` against a snapshot with `overrides` applied.
    ///
    /// `self` is never mutated, so nothing needs restoring when `scope`
    /// returns early, fails, or panics.
    pub fn with_options<R>(
        &self,
        overrides: ConfigOverrides,
        scope: impl FnOnce(&LocalizationConfig) -> R,
    ) -> R {
        let snapshot = self.overridden(overrides);
        scope(&snapshot)
    }

    /// Load configuration from `LOCALIZATION_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let locales = parse_locales(
            &std::env::var("LOCALIZATION_LOCALES").context("LOCALIZATION_LOCALES not set")?,
        )?;

        let primary = match std::env::var("LOCALIZATION_PRIMARY_LOCALE") {
            Ok(code) => find_locale(&locales, &code).context("Invalid LOCALIZATION_PRIMARY_LOCALE")?,
            Err(_) => locales
                .first()
                .cloned()
                .context("LOCALIZATION_LOCALES is empty")?,
        };

        let current = match std::env::var("LOCALIZATION_CURRENT_LOCALE") {
            Ok(code) => find_locale(&locales, &code).context("Invalid LOCALIZATION_CURRENT_LOCALE")?,
            Err(_) => primary.clone(),
        };

        let fallback = match std::env::var("LOCALIZATION_FALLBACK_LOCALE") {
            Ok(code) if !code.trim().is_empty() => Some(
                find_locale(&locales, &code).context("Invalid LOCALIZATION_FALLBACK_LOCALE")?,
            ),
            _ => None,
        };

        let cache_mode = match std::env::var("LOCALIZATION_CACHE") {
            Ok(mode) => mode.parse().context("Invalid LOCALIZATION_CACHE")?,
            Err(_) => CacheMode::default(),
        };

        let directory =
            LocaleDirectory::new(primary, locales).with_current(Deferred::fixed(current));

        let mut config = Self::new(directory).with_cache_mode(cache_mode);
        config.fallback_locale = fallback.map(FallbackLocale::Fixed);
        Ok(config)
    }
}

/// Settings to replace for the duration of [`LocalizationConfig::with_options`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub primary_locale: Option<Deferred<Locale>>,
    pub current_locale: Option<Deferred<Locale>>,
    pub all_locales: Option<Deferred<Vec<Locale>>>,
    /// `Some(None)` removes the configured fallback
    pub fallback_locale: Option<Option<FallbackLocale>>,
    pub cache_mode: Option<CacheMode>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_locale(mut self, primary: Deferred<Locale>) -> Self {
        self.primary_locale = Some(primary);
        self
    }

    pub fn current_locale(mut self, current: Deferred<Locale>) -> Self {
        self.current_locale = Some(current);
        self
    }

    pub fn all_locales(mut self, all: Deferred<Vec<Locale>>) -> Self {
        self.all_locales = Some(all);
        self
    }

    pub fn fallback_locale(mut self, fallback: Option<FallbackLocale>) -> Self {
        self.fallback_locale = Some(fallback);
        self
    }

    pub fn cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = Some(cache_mode);
        self
    }
}

/// Parse `id:code[:name]` entries separated by commas.
pub fn parse_locales(raw: &str) -> Result<Vec<Locale>> {
    let mut locales: Vec<Locale> = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let mut parts = entry.splitn(3, ':').map(str::trim);
        let id = parts.next().unwrap_or_default();
        let code = parts.next().unwrap_or_default();
        let name = parts.next().filter(|name| !name.is_empty()).unwrap_or(code);

        if code.is_empty() {
            bail!("Locale entry '{}' must look like id:code[:name]", entry);
        }
        let id: i64 = id
            .parse()
            .with_context(|| format!("Locale entry '{}' has a non-numeric id", entry))?;

        if locales.iter().any(|locale| locale.id().0 == id || locale.code() == code) {
            bail!("Duplicate locale entry '{}'", entry);
        }
        locales.push(Locale::new(id, code, name));
    }

    if locales.is_empty() {
        bail!("No locales configured");
    }
    Ok(locales)
}

fn find_locale(locales: &[Locale], code: &str) -> Result<Locale> {
    let code = code.trim();
    match locales.iter().find(|locale| locale.code() == code) {
        Some(locale) => Ok(locale.clone()),
        None => bail!("Unknown locale code: '{}'", code),
    }
}
