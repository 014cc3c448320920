//! Fallback locale: consulted when the requested locale has no value.

use super::Locale;
use crate::error::{LocalizationError, Result, RuleError};
use crate::store::{LocalizationSet, OwnerId};
use std::fmt;
use std::sync::Arc;

type FallbackRuleFn =
    Arc<dyn Fn(&FallbackContext<'_>) -> std::result::Result<Locale, RuleError> + Send + Sync>;

/// What a fallback rule gets to look at: the owning entity's id and its
/// loaded localizations.
#[derive(Debug, Clone, Copy)]
pub struct FallbackContext<'a> {
    pub owner: OwnerId,
    pub localizations: &'a LocalizationSet,
}

/// Fixed fallback locale, or a rule computing one from the owning entity.
///
/// Rules can be arbitrarily expensive, so they only run once the requested
/// locale has already come up blank.
#[derive(Clone)]
pub enum FallbackLocale {
    Fixed(Locale),
    Rule(FallbackRuleFn),
}

impl FallbackLocale {
    pub fn fixed(locale: Locale) -> Self {
        FallbackLocale::Fixed(locale)
    }

    pub fn rule<F>(rule: F) -> Self
    where
        F: Fn(&FallbackContext<'_>) -> std::result::Result<Locale, RuleError>
            + Send
            + Sync
            + 'static,
    {
        FallbackLocale::Rule(Arc::new(rule))
    }

    pub fn resolve(&self, context: &FallbackContext<'_>) -> Result<Locale> {
        match self {
            FallbackLocale::Fixed(locale) => Ok(locale.clone()),
            FallbackLocale::Rule(rule) => rule(context).map_err(LocalizationError::Rule),
        }
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, FallbackLocale::Rule(_))
    }
}

impl From<Locale> for FallbackLocale {
    fn from(locale: Locale) -> Self {
        FallbackLocale::Fixed(locale)
    }
}

impl fmt::Debug for FallbackLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackLocale::Fixed(locale) => f.debug_tuple("Fixed").field(locale).finish(),
            FallbackLocale::Rule(_) => f.write_str("Rule(..)"),
        }
    }
}
