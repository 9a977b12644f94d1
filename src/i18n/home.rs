//! Locale home-page locator: the approximate inverse of the URL mapper.
//!
//! There is no stored "is home page for locale X" marker, so this walks a
//! ladder of heuristics and takes the first hit. Multiple pages can
//! plausibly qualify; query-natural (insert) order breaks ties.

use anyhow::Result;
use tracing::debug;

use crate::db::Database;
use crate::i18n::urlmap::lang_tag;
use crate::i18n::DEFAULT_LOCALE;

/// Find the home-page path for a locale.
///
/// The default locale lives at the site root. For the rest, in order:
/// candidate slugs whose page is tagged with the locale, a "home" keyword
/// search among pages tagged with the locale, any page whose slug
/// contains the language tag, and finally the site root.
pub fn find_home(db: &Database, locale: &str) -> Result<String> {
    if locale == DEFAULT_LOCALE {
        return Ok("/".to_string());
    }

    let lang = lang_tag(locale);
    let candidates = [
        lang.to_string(),
        locale.to_lowercase().replace('_', "-"),
        format!("home-{}", lang),
        format!("index-{}", lang),
    ];

    for slug in &candidates {
        if let Some(page) = db.get_page_by_slug(slug)? {
            if page.locale_tag.as_deref() == Some(locale) {
                debug!(locale, slug = %page.slug, "home page found by candidate slug");
                return Ok(format!("/{}", page.slug));
            }
        }
    }

    for page in db.pages_tagged(locale)? {
        if page.slug.contains("home") || page.title.to_lowercase().contains("home") {
            debug!(locale, slug = %page.slug, "home page found by keyword search");
            return Ok(format!("/{}", page.slug));
        }
    }

    if let Some(page) = db.pages_slug_contains(lang)?.into_iter().next() {
        debug!(locale, slug = %page.slug, "home page found by slug fragment");
        return Ok(format!("/{}", page.slug));
    }

    Ok("/".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentKind;

    fn test_db() -> Database {
        Database::new(":memory:").expect("in-memory database")
    }

    #[test]
    fn test_default_locale_is_site_root() {
        let db = test_db();
        assert_eq!(find_home(&db, DEFAULT_LOCALE).unwrap(), "/");
    }

    #[test]
    fn test_candidate_slug_with_matching_tag_wins() {
        let db = test_db();
        db.insert_content(ContentKind::Page, "about-us-it", "Chi siamo", Some("it_IT"))
            .unwrap();
        db.insert_content(ContentKind::Page, "it", "Benvenuto", Some("it_IT"))
            .unwrap();

        assert_eq!(find_home(&db, "it_IT").unwrap(), "/it");
    }

    #[test]
    fn test_hyphenated_locale_slug_accepted() {
        let db = test_db();
        db.insert_content(ContentKind::Page, "it-it", "Benvenuto", Some("it_IT"))
            .unwrap();

        assert_eq!(find_home(&db, "it_IT").unwrap(), "/it-it");
    }

    #[test]
    fn test_candidate_slug_with_wrong_tag_is_skipped() {
        let db = test_db();
        // Slug matches the candidate but the page belongs to another locale.
        db.insert_content(ContentKind::Page, "sq", "Other", Some("it_IT"))
            .unwrap();
        db.insert_content(ContentKind::Page, "home-sq", "Shtëpia", Some("sq_AL"))
            .unwrap();

        assert_eq!(find_home(&db, "sq_AL").unwrap(), "/home-sq");
    }

    #[test]
    fn test_keyword_fallback_among_tagged_pages() {
        let db = test_db();
        db.insert_content(ContentKind::Page, "benvenuto", "Home Italiana", Some("it_IT"))
            .unwrap();

        assert_eq!(find_home(&db, "it_IT").unwrap(), "/benvenuto");
    }

    #[test]
    fn test_slug_fragment_fallback() {
        let db = test_db();
        // Not tagged with the locale, but the slug carries the tag.
        db.insert_content(ContentKind::Page, "chi-siamo-it", "Chi siamo", None)
            .unwrap();

        assert_eq!(find_home(&db, "it_IT").unwrap(), "/chi-siamo-it");
    }

    #[test]
    fn test_site_root_as_last_resort() {
        let db = test_db();
        assert_eq!(find_home(&db, "it_IT").unwrap(), "/");
    }

    #[test]
    fn test_first_found_wins_in_insert_order() {
        let db = test_db();
        db.insert_content(ContentKind::Page, "home-it-old", "Home", Some("it_IT"))
            .unwrap();
        db.insert_content(ContentKind::Page, "home-it-new", "Home", Some("it_IT"))
            .unwrap();

        assert_eq!(find_home(&db, "it_IT").unwrap(), "/home-it-old");
    }
}
