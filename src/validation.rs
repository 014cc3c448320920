//! Presence validation for required localized attributes.
//!
//! When a schema is marked `required`, the entity must carry a localization
//! for the primary locale, and every required attribute on it must be
//! non-blank. Localizations for locales outside the directory are reported as
//! warnings.

use crate::config::LocalizationConfig;
use crate::entity::LocalizedEntity;
use crate::error::Result;
use crate::store::{is_blank, LocalizationBackend};
use std::fmt;
use std::sync::Arc;

/// Validation report containing errors and warnings about an entity's localizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that block saving
    pub errors: Vec<String>,

    /// Non-blocking observations
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no errors");
        }
        write!(f, "{}", self.errors.join("; "))
    }
}

/// Check an entity's localizations against its schema options.
pub fn validate<B: LocalizationBackend>(
    entity: &mut LocalizedEntity<B>,
    config: &LocalizationConfig,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();
    let schema = Arc::clone(entity.schema());
    let known = config.directory.locale_ids()?;
    let primary = if schema.options().required {
        Some(config.directory.primary_locale()?)
    } else {
        None
    };

    let localizations = entity.localizations()?;

    for record in localizations {
        if !known.contains(&record.locale_id()) {
            report.warnings.push(format!(
                "{}: localization for unknown locale id {}",
                schema.options().association_name,
                record.locale_id()
            ));
        }
    }

    if let Some(primary) = primary {
        match localizations.find(primary.id()) {
            None => report.errors.push(format!(
                "{}: primary locale localization is required",
                schema.options().association_name
            )),
            Some(record) => {
                for attribute in schema.required_attributes() {
                    if is_blank(record.value(attribute)) {
                        report
                            .errors
                            .push(format!("{}: this field is required", attribute));
                    }
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{Locale, LocaleDirectory};
    use crate::schema::{TableOptions, TranslatableSchema};
    use crate::store::{MemoryBackend, OwnerId};

    fn config() -> LocalizationConfig {
        let english = Locale::new(1, "en", "English");
        let french = Locale::new(2, "fr", "French");
        LocalizationConfig::new(LocaleDirectory::new(english.clone(), vec![english, french]))
    }

    fn entity(options: TableOptions) -> LocalizedEntity<MemoryBackend> {
        let schema = TranslatableSchema::new("Article", ["name", "description"]).with_options(options);
        LocalizedEntity::new(OwnerId(1), Arc::new(schema), MemoryBackend::new())
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_new_report_is_clean() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "no errors");
    }

    #[test]
    fn test_report_display_joins_errors() {
        let mut report = ValidationReport::default();
        report.errors.push("name: this field is required".to_string());
        report.errors.push("description: this field is required".to_string());
        assert_eq!(
            report.to_string(),
            "name: this field is required; description: this field is required"
        );
    }

    // ==================== Rule Tests ====================

    #[test]
    fn test_not_required_passes_without_localizations() {
        let config = config();
        let mut entity = entity(TableOptions::default());
        let report = validate(&mut entity, &config).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_required_without_primary_localization() {
        let config = config();
        let mut entity = entity(TableOptions::default().required(true));
        let report = validate(&mut entity, &config).unwrap();
        assert_eq!(
            report.errors,
            vec!["localizations: primary locale localization is required".to_string()]
        );
    }

    #[test]
    fn test_required_attributes_must_be_present() {
        let config = config();
        let mut entity = entity(TableOptions::default().required(true));
        config.resolver().write(&mut entity, "name", "Test").unwrap();

        let report = validate(&mut entity, &config).unwrap();
        assert_eq!(
            report.errors,
            vec!["description: this field is required".to_string()]
        );
    }

    #[test]
    fn test_optional_attributes_are_exempt() {
        let config = config();
        let mut entity = entity(
            TableOptions::default()
                .required(true)
                .optional(["description"]),
        );
        config.resolver().write(&mut entity, "name", "Test").unwrap();

        let report = validate(&mut entity, &config).unwrap();
        assert!(!report.has_errors());
    }

    #[test]
    fn test_unknown_locale_is_a_warning() {
        let config = config();
        let mut entity = entity(TableOptions::default());
        entity
            .localizations_mut()
            .unwrap()
            .find_or_build(crate::locale::LocaleId(99))
            .set("name", "Stray");

        let report = validate(&mut entity, &config).unwrap();
        assert!(!report.has_errors());
        assert_eq!(
            report.warnings,
            vec!["localizations: localization for unknown locale id 99".to_string()]
        );
    }
}
