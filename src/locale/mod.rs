//! Locale identities and the directory that supplies them.
//!
//! # Architecture
//!
//! - `identity`: `Locale` and `LocaleId`, compared by id only
//! - `directory`: `Deferred` values and the `LocaleDirectory` (primary, current, all)
//! - `fallback`: `FallbackLocale`, the fixed-or-computed fallback consulted on blank values
//!
//! # Example
//!
//! ```rust
//! use localization_table::locale::{Deferred, Locale, LocaleDirectory};
//!
//! let english = Locale::new(1, "en", "English");
//! let french = Locale::new(2, "fr", "French");
//!
//! let directory = LocaleDirectory::new(english.clone(), vec![english.clone(), french.clone()])
//!     .with_current(Deferred::fixed(french.clone()));
//!
//! assert_eq!(directory.current_locale().unwrap(), french);
//! assert_eq!(directory.primary_locale().unwrap(), english);
//! ```

mod directory;
mod fallback;
mod identity;

pub use directory::{Deferred, LocaleDirectory};
pub use fallback::{FallbackContext, FallbackLocale};
pub use identity::{Locale, LocaleId};
