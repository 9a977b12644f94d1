//! Locale handling: registry, per-visitor store, resolution, and the two
//! URL operations.
//!
//! # Architecture
//!
//! - `registry`: persisted mapping of locale -> language metadata
//! - `store`: request-scoped view over the visitor's locale cookie
//! - `resolver`: precedence-based resolution plus the page resync path
//! - `urlmap`: forward mapping of canonical paths to localized forms
//! - `home`: best-effort reverse lookup of a locale's home page

pub mod home;
mod registry;
mod resolver;
mod store;
pub mod urlmap;

pub use registry::{default_entry, LanguageEntry, LanguageRegistry, RegistryError};
pub use resolver::{resolve, sync_with_page};
pub use store::{LocaleStore, COOKIE_MAX_AGE_DAYS, COOKIE_NAME};

/// Hard default locale: the value resolution falls back to when nothing
/// else applies, and the one locale that never needs a translation pack.
pub const DEFAULT_LOCALE: &str = "en_US";
