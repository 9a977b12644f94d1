//! Locale resolver: computes the effective locale for the current request.

use tracing::debug;

use crate::i18n::{LanguageRegistry, LocaleStore, DEFAULT_LOCALE};

/// Resolve the locale in effect for this request.
///
/// Precedence, highest first:
/// 1. explicit switch signal - persisted to the store before returning;
/// 2. stored cookie, returned verbatim (no registry validation);
/// 3. first active registry entry in insertion order;
/// 4. the hard default.
///
/// Resolution always yields a locale string; it never fails, even for a
/// switch signal naming a locale the registry has never heard of.
pub fn resolve(
    store: &mut LocaleStore,
    switch: Option<&str>,
    registry: &LanguageRegistry,
) -> String {
    if let Some(requested) = switch {
        store.set(requested);
        debug!(locale = requested, "resolved from switch signal");
        return requested.to_string();
    }

    if let Some(stored) = store.get() {
        return stored.to_string();
    }

    if let Some(entry) = registry.first_active() {
        return entry.locale.clone();
    }

    DEFAULT_LOCALE.to_string()
}

/// Resynchronize the store with the locale tag of the page being viewed.
///
/// Secondary write path, separate from `resolve`: after the main content
/// of a page-type request is identified, a page tagged with a specific
/// active locale pulls the stored preference along with it. Pages tagged
/// "all", untagged pages, and tags that are unknown or inactive leave the
/// store untouched.
pub fn sync_with_page(
    store: &mut LocaleStore,
    page_tag: Option<&str>,
    registry: &LanguageRegistry,
) {
    let tag = match page_tag {
        Some(tag) if tag != crate::content::ALL_LOCALES_TAG => tag,
        _ => return,
    };

    if !registry.is_active(tag) {
        debug!(tag, "page tag not active, keeping stored locale");
        return;
    }

    if store.get() != Some(tag) {
        debug!(tag, previous = ?store.get(), "resyncing stored locale to page tag");
        store.set(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageEntry;

    fn entry(locale: &str, code: &str, active: bool) -> LanguageEntry {
        LanguageEntry {
            code: code.to_string(),
            name: locale.to_string(),
            locale: locale.to_string(),
            flag: String::new(),
            active,
        }
    }

    fn registry(entries: Vec<LanguageEntry>) -> LanguageRegistry {
        LanguageRegistry::from_entries(entries).expect("test registry")
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_switch_signal_wins_and_persists() {
        let mut store = LocaleStore::from_cookie(Some("en_US".to_string()));
        let registry = LanguageRegistry::default();

        let locale = resolve(&mut store, Some("it_IT"), &registry);

        assert_eq!(locale, "it_IT");
        assert_eq!(store.get(), Some("it_IT"));
        assert_eq!(store.pending_write(), Some("it_IT"));
    }

    #[test]
    fn test_switch_signal_unknown_locale_still_succeeds() {
        let mut store = LocaleStore::from_cookie(None);
        let registry = LanguageRegistry::default();

        let locale = resolve(&mut store, Some("xx_XX"), &registry);

        assert_eq!(locale, "xx_XX");
        assert_eq!(store.pending_write(), Some("xx_XX"));
    }

    #[test]
    fn test_cookie_returned_verbatim_without_validation() {
        let mut store = LocaleStore::from_cookie(Some("zz_ZZ".to_string()));
        let registry = LanguageRegistry::default();

        let locale = resolve(&mut store, None, &registry);

        assert_eq!(locale, "zz_ZZ");
        assert_eq!(store.pending_write(), None);
    }

    #[test]
    fn test_first_active_entry_in_insertion_order() {
        let mut store = LocaleStore::from_cookie(None);
        let registry = registry(vec![
            entry("sq_AL", "sq", false),
            entry("en_US", "en", true),
            entry("it_IT", "it", true),
        ]);

        assert_eq!(resolve(&mut store, None, &registry), "en_US");
    }

    #[test]
    fn test_hard_default_when_nothing_active() {
        let mut store = LocaleStore::from_cookie(None);
        let registry = registry(vec![entry("it_IT", "it", false)]);

        assert_eq!(resolve(&mut store, None, &registry), DEFAULT_LOCALE);
        assert_eq!(store.pending_write(), None);
    }

    // ==================== sync_with_page Tests ====================

    #[test]
    fn test_sync_overwrites_differing_store() {
        let mut store = LocaleStore::from_cookie(Some("it_IT".to_string()));
        let registry = registry(vec![entry("en_US", "en", true), entry("it_IT", "it", true)]);

        sync_with_page(&mut store, Some("en_US"), &registry);

        assert_eq!(store.get(), Some("en_US"));
        assert_eq!(store.pending_write(), Some("en_US"));
    }

    #[test]
    fn test_sync_ignores_all_tag() {
        let mut store = LocaleStore::from_cookie(Some("it_IT".to_string()));
        let registry = LanguageRegistry::default();

        sync_with_page(&mut store, Some("all"), &registry);

        assert_eq!(store.get(), Some("it_IT"));
        assert_eq!(store.pending_write(), None);
    }

    #[test]
    fn test_sync_ignores_untagged_page() {
        let mut store = LocaleStore::from_cookie(Some("it_IT".to_string()));
        let registry = LanguageRegistry::default();

        sync_with_page(&mut store, None, &registry);

        assert_eq!(store.pending_write(), None);
    }

    #[test]
    fn test_sync_ignores_inactive_or_unknown_tag() {
        let mut store = LocaleStore::from_cookie(Some("en_US".to_string()));
        let registry = registry(vec![entry("en_US", "en", true), entry("it_IT", "it", false)]);

        sync_with_page(&mut store, Some("it_IT"), &registry);
        assert_eq!(store.pending_write(), None);

        sync_with_page(&mut store, Some("fr_FR"), &registry);
        assert_eq!(store.pending_write(), None);
    }

    #[test]
    fn test_sync_noop_when_already_matching() {
        let mut store = LocaleStore::from_cookie(Some("en_US".to_string()));
        let registry = LanguageRegistry::default();

        sync_with_page(&mut store, Some("en_US"), &registry);

        // No redundant write.
        assert_eq!(store.pending_write(), None);
    }
}
