//! Language registry: the persisted mapping of locale -> language metadata.
//!
//! Entries keep their insertion order because resolution falls back to the
//! first active entry. The registry is replaced wholesale by the admin
//! operation; there is no partial update path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n::DEFAULT_LOCALE;

/// Metadata for one configured language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Short display code (e.g. "en", "it"), 2-10 characters.
    pub code: String,

    /// Human-readable name (e.g. "English", "Italiano").
    pub name: String,

    /// Region-qualified locale identifier (e.g. "en_US", "it_IT").
    /// Unique key within the registry.
    pub locale: String,

    /// Flag glyph shown by the switcher.
    #[serde(default)]
    pub flag: String,

    /// Whether visitors can resolve to this language.
    pub active: bool,
}

/// Validation failures for a replace-registry payload.
///
/// Any of these rejects the payload wholesale; nothing is applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry payload contains no languages")]
    Empty,

    #[error("duplicate locale '{0}' in registry payload")]
    DuplicateLocale(String),

    #[error("entry has an empty locale identifier")]
    MissingLocale,

    #[error("locale '{0}' has an empty name")]
    MissingName(String),

    #[error("locale '{locale}' has invalid code '{code}' (expected 2-10 characters)")]
    InvalidCode { locale: String, code: String },
}

/// Ordered collection of language entries, keyed by locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    entries: Vec<LanguageEntry>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self {
            entries: vec![default_entry()],
        }
    }
}

/// The single entry a fresh installation starts with.
pub fn default_entry() -> LanguageEntry {
    LanguageEntry {
        code: "en".to_string(),
        name: "English".to_string(),
        locale: DEFAULT_LOCALE.to_string(),
        flag: "\u{1F1FA}\u{1F1F8}".to_string(),
        active: true,
    }
}

impl LanguageRegistry {
    /// Build a registry from a full replacement payload.
    ///
    /// Locale uniqueness is enforced here, at the data layer, rather than
    /// trusting whatever produced the payload.
    pub fn from_entries(entries: Vec<LanguageEntry>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen: Vec<&str> = Vec::with_capacity(entries.len());
        for entry in &entries {
            if entry.locale.is_empty() {
                return Err(RegistryError::MissingLocale);
            }
            if entry.name.is_empty() {
                return Err(RegistryError::MissingName(entry.locale.clone()));
            }
            let code_len = entry.code.chars().count();
            if !(2..=10).contains(&code_len) {
                return Err(RegistryError::InvalidCode {
                    locale: entry.locale.clone(),
                    code: entry.code.clone(),
                });
            }
            if seen.contains(&entry.locale.as_str()) {
                return Err(RegistryError::DuplicateLocale(entry.locale.clone()));
            }
            seen.push(entry.locale.as_str());
        }

        Ok(Self { entries })
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// Look up an entry by its locale identifier.
    pub fn get(&self, locale: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|entry| entry.locale == locale)
    }

    /// First active entry in insertion order, if any.
    pub fn first_active(&self) -> Option<&LanguageEntry> {
        self.entries.iter().find(|entry| entry.active)
    }

    /// Active entries in insertion order.
    pub fn active_entries(&self) -> Vec<&LanguageEntry> {
        self.entries.iter().filter(|entry| entry.active).collect()
    }

    /// Whether the locale names an entry that is active.
    pub fn is_active(&self, locale: &str) -> bool {
        self.get(locale).map(|entry| entry.active).unwrap_or(false)
    }
}
