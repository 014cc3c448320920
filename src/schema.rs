//! Translatable schema: the registration table of localized attributes for
//! one entity type, plus the per-type table options.

use crate::entity::LocalizedEntity;
use crate::error::{LocalizationError, Result};
use crate::locale::Locale;
use crate::resolver::{LocalizedValueResolver, ReadOptions};
use crate::store::LocalizationBackend;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Columns never treated as translatable when deriving from a column list.
const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Options declared alongside the translatable attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Require a primary-locale localization with every non-optional attribute filled
    pub required: bool,

    /// Attributes exempt from the `required` check
    pub optional: BTreeSet<String>,

    /// Build missing localizations as soon as a new entity is initialized
    pub initialize: bool,

    /// Name of the localization collection, used in validation messages
    pub association_name: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            required: false,
            optional: BTreeSet::new(),
            initialize: true,
            association_name: "localizations".to_string(),
        }
    }
}

impl TableOptions {
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn initialize(mut self, initialize: bool) -> Self {
        self.initialize = initialize;
        self
    }

    pub fn association_name(mut self, name: impl Into<String>) -> Self {
        self.association_name = name.into();
        self
    }
}

/// The set of translatable attributes for one entity type.
///
/// Built once when the entity type is declared; every accessor and resolver
/// call checks names against it and fails with
/// [`LocalizationError::UnknownAttribute`] on a miss.
#[derive(Debug, Clone)]
pub struct TranslatableSchema {
    entity_name: String,
    attributes: Vec<String>,
    options: TableOptions,
}

impl TranslatableSchema {
    pub fn new<I, S>(entity_name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let attributes = attributes
            .into_iter()
            .map(Into::into)
            .filter(|attribute: &String| seen.insert(attribute.clone()))
            .collect();

        Self {
            entity_name: entity_name.into(),
            attributes,
            options: TableOptions::default(),
        }
    }

    /// Derive the translatable attributes from a localization table's columns,
    /// skipping the primary key, foreign keys and timestamps.
    pub fn from_columns<I, S>(entity_name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: Vec<String> = columns
            .into_iter()
            .map(Into::into)
            .filter(|column| {
                column != "id"
                    && !column.ends_with("_id")
                    && !TIMESTAMP_COLUMNS.contains(&column.as_str())
            })
            .collect();
        Self::new(entity_name, attributes)
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Attribute names in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|known| known == attribute)
    }

    /// Fail with `UnknownAttribute` unless `attribute` is translatable.
    pub fn ensure_attribute(&self, attribute: &str) -> Result<()> {
        if self.contains(attribute) {
            Ok(())
        } else {
            Err(LocalizationError::UnknownAttribute(attribute.to_string()))
        }
    }

    pub fn is_required(&self, attribute: &str) -> bool {
        self.options.required && !self.options.optional.contains(attribute)
    }

    pub fn required_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes().filter(|attribute| self.is_required(attribute))
    }

    /// Resolve a getter/setter handle for `name`.
    pub fn accessor(&self, name: &str) -> Result<AttributeAccessor> {
        self.ensure_attribute(name)?;
        Ok(AttributeAccessor {
            name: Arc::from(name),
        })
    }

    /// Handles for every attribute, in declaration order.
    pub fn accessors(&self) -> Vec<AttributeAccessor> {
        self.attributes
            .iter()
            .map(|name| AttributeAccessor {
                name: Arc::from(name.as_str()),
            })
            .collect()
    }
}

/// Getter/setter pair for one translatable attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAccessor {
    name: Arc<str>,
}

impl AttributeAccessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read in the current locale with the configured fallback.
    pub fn get<B: LocalizationBackend>(
        &self,
        resolver: &LocalizedValueResolver<'_>,
        entity: &mut LocalizedEntity<B>,
    ) -> Result<String> {
        resolver.read(entity, &self.name)
    }

    pub fn get_with<B: LocalizationBackend>(
        &self,
        resolver: &LocalizedValueResolver<'_>,
        entity: &mut LocalizedEntity<B>,
        options: ReadOptions,
    ) -> Result<String> {
        resolver.read_with(entity, &self.name, options)
    }

    /// Write in the current locale.
    pub fn set<B: LocalizationBackend>(
        &self,
        resolver: &LocalizedValueResolver<'_>,
        entity: &mut LocalizedEntity<B>,
        value: impl ToString,
    ) -> Result<()> {
        resolver.write(entity, &self.name, value)
    }

    pub fn set_for<B: LocalizationBackend>(
        &self,
        resolver: &LocalizedValueResolver<'_>,
        entity: &mut LocalizedEntity<B>,
        value: impl ToString,
        locale: &Locale,
    ) -> Result<()> {
        resolver.write_for(entity, &self.name, value, Some(locale))
    }

    /// Whether the current locale's localization changed since it was last persisted.
    pub fn changed<B: LocalizationBackend>(
        &self,
        resolver: &LocalizedValueResolver<'_>,
        entity: &mut LocalizedEntity<B>,
    ) -> Result<bool> {
        resolver.attribute_changed(entity, &self.name, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_order_and_drops_duplicates() {
        let schema = TranslatableSchema::new("Article", ["name", "description", "name"]);
        assert_eq!(
            schema.attributes().collect::<Vec<_>>(),
            vec!["name", "description"]
        );
        assert_eq!(schema.entity_name(), "Article");
    }

    #[test]
    fn test_from_columns_skips_keys_and_timestamps() {
        let schema = TranslatableSchema::from_columns(
            "Article",
            [
                "id",
                "article_id",
                "locale_id",
                "name",
                "description",
                "created_at",
                "updated_at",
            ],
        );
        assert_eq!(
            schema.attributes().collect::<Vec<_>>(),
            vec!["name", "description"]
        );
    }

    #[test]
    fn test_ensure_attribute() {
        let schema = TranslatableSchema::new("Article", ["name"]);
        assert!(schema.ensure_attribute("name").is_ok());
        let err = schema.ensure_attribute("title").unwrap_err();
        assert!(matches!(err, LocalizationError::UnknownAttribute(name) if name == "title"));
    }

    // ==================== Options Tests ====================

    #[test]
    fn test_default_options() {
        let options = TableOptions::default();
        assert!(!options.required);
        assert!(options.initialize);
        assert_eq!(options.association_name, "localizations");
    }

    #[test]
    fn test_is_required_only_when_schema_required() {
        let schema = TranslatableSchema::new("Article", ["name", "description"]);
        assert!(!schema.is_required("name"));

        let schema = schema.with_options(TableOptions::default().required(true));
        assert!(schema.is_required("name"));
        assert!(schema.is_required("description"));
    }

    #[test]
    fn test_optional_attributes_are_not_required() {
        let schema = TranslatableSchema::new("Article", ["name", "description"]).with_options(
            TableOptions::default()
                .required(true)
                .optional(["description"]),
        );
        assert_eq!(schema.required_attributes().collect::<Vec<_>>(), vec!["name"]);
    }

    // ==================== Accessor Tests ====================

    #[test]
    fn test_accessor_for_known_attribute() {
        let schema = TranslatableSchema::new("Article", ["name"]);
        assert_eq!(schema.accessor("name").unwrap().name(), "name");
    }

    #[test]
    fn test_accessor_for_unknown_attribute_fails() {
        let schema = TranslatableSchema::new("Article", ["name"]);
        assert!(matches!(
            schema.accessor("title"),
            Err(LocalizationError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_accessors_cover_every_attribute() {
        let schema = TranslatableSchema::new("Article", ["name", "description"]);
        let names: Vec<_> = schema
            .accessors()
            .iter()
            .map(|accessor| accessor.name().to_string())
            .collect();
        assert_eq!(names, vec!["name", "description"]);
    }
}
