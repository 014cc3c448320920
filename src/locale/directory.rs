//! Locale directory: the primary, current and known locales.
//!
//! Each entry is either a fixed value or a rule evaluated on every call.
//! The directory never caches rule results; callers that need a stable value
//! for the duration of an operation evaluate once and hold on to it.

use super::{Locale, LocaleId};
use crate::error::{LocalizationError, Result, RuleError};
use std::fmt;
use std::sync::Arc;

type RuleFn<T> = Arc<dyn Fn() -> std::result::Result<T, RuleError> + Send + Sync>;

/// A value that is either known up front or computed on demand.
pub enum Deferred<T> {
    Fixed(T),
    Rule(RuleFn<T>),
}

impl<T: Clone> Deferred<T> {
    pub fn fixed(value: T) -> Self {
        Deferred::Fixed(value)
    }

    /// Wrap a rule, e.g. "the signed-in user's locale".
    pub fn rule<F>(rule: F) -> Self
    where
        F: Fn() -> std::result::Result<T, RuleError> + Send + Sync + 'static,
    {
        Deferred::Rule(Arc::new(rule))
    }

    /// Produce the value, running the rule if there is one.
    pub fn evaluate(&self) -> Result<T> {
        match self {
            Deferred::Fixed(value) => Ok(value.clone()),
            Deferred::Rule(rule) => rule().map_err(LocalizationError::Rule),
        }
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, Deferred::Rule(_))
    }
}

impl<T: Clone> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        match self {
            Deferred::Fixed(value) => Deferred::Fixed(value.clone()),
            Deferred::Rule(rule) => Deferred::Rule(Arc::clone(rule)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Deferred::Rule(_) => f.write_str("Rule(..)"),
        }
    }
}

/// Supplies the locales the resolver works with.
#[derive(Debug, Clone)]
pub struct LocaleDirectory {
    primary: Deferred<Locale>,
    current: Deferred<Locale>,
    all: Deferred<Vec<Locale>>,
}

impl LocaleDirectory {
    /// Create a directory with a fixed primary locale and locale list.
    ///
    /// The current locale starts out as the primary locale.
    pub fn new(primary: Locale, all: Vec<Locale>) -> Self {
        Self {
            current: Deferred::fixed(primary.clone()),
            primary: Deferred::fixed(primary),
            all: Deferred::fixed(all),
        }
    }

    pub fn with_primary(mut self, primary: Deferred<Locale>) -> Self {
        self.primary = primary;
        self
    }

    pub fn with_current(mut self, current: Deferred<Locale>) -> Self {
        self.current = current;
        self
    }

    pub fn with_all(mut self, all: Deferred<Vec<Locale>>) -> Self {
        self.all = all;
        self
    }

    pub fn primary_locale(&self) -> Result<Locale> {
        self.primary.evaluate()
    }

    pub fn current_locale(&self) -> Result<Locale> {
        self.current.evaluate()
    }

    /// All known locales, in canonical order.
    pub fn all_locales(&self) -> Result<Vec<Locale>> {
        self.all.evaluate()
    }

    /// Ids of all known locales, in canonical order.
    pub fn locale_ids(&self) -> Result<Vec<LocaleId>> {
        Ok(self.all_locales()?.iter().map(Locale::id).collect())
    }

    /// Look up a known locale by its code.
    pub fn find_by_code(&self, code: &str) -> Result<Option<Locale>> {
        Ok(self
            .all_locales()?
            .into_iter()
            .find(|locale| locale.code() == code))
    }
}
