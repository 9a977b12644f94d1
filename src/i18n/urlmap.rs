//! URL mapper: derives the locale-specific form of a canonical path.
//!
//! One-directional by design. The approximate reverse (locale -> home
//! page) lives in `home.rs`.

use crate::i18n::DEFAULT_LOCALE;

/// Path prefixes that never get a locale suffix: these listings are
/// shared across languages and filtered by the content filter instead.
pub const EXEMPT_PREFIXES: &[&str] = &["/product-category", "/blog", "/shop", "/compare"];

/// Short language tag for a locale: its first two characters
/// ("it_IT" -> "it", "sq_AL" -> "sq").
pub fn lang_tag(locale: &str) -> &str {
    match locale.char_indices().nth(2) {
        Some((idx, _)) => &locale[..idx],
        None => locale,
    }
}

/// Whether `path` is the prefix itself or a descendant of it.
/// Segment-boundary match: "/shop" covers "/shop" and "/shop/sales",
/// not "/shopping".
fn under_prefix(path: &str, prefix: &str) -> bool {
    let trimmed = trim_trailing_slash(path);
    trimmed == prefix
        || (trimmed.starts_with(prefix) && trimmed.as_bytes()[prefix.len()] == b'/')
}

/// Whether the path is exempt from locale mapping.
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PREFIXES
        .iter()
        .any(|prefix| under_prefix(path, prefix))
}

/// Map a canonical path to its locale-specific form.
///
/// The default locale and exempt paths pass through unchanged. The site
/// root maps to `/{lang}`; anything else gets a `-{lang}` suffix on the
/// trailing-slash-trimmed path.
pub fn map_path(path: &str, locale: &str) -> String {
    if locale == DEFAULT_LOCALE || is_exempt(path) {
        return path.to_string();
    }

    let lang = lang_tag(locale);
    if path == "/" {
        return format!("/{}", lang);
    }

    format!("{}-{}", trim_trailing_slash(path), lang)
}

/// Trim a single trailing slash, keeping the bare root as "/".
pub fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Path equality up to one trailing slash.
pub fn paths_match(a: &str, b: &str) -> bool {
    trim_trailing_slash(a) == trim_trailing_slash(b)
}
