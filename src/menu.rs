//! Menu annotator: marks navigation entries as "current" for the
//! resolved locale.

use serde::{Deserialize, Serialize};

use crate::i18n::urlmap::{lang_tag, map_path, paths_match, trim_trailing_slash};
use crate::i18n::DEFAULT_LOCALE;

/// Marker classes identifying the current menu entry.
pub const CURRENT_MARKERS: &[&str] = &["current-menu-item", "current-page-item"];

/// One navigation entry. `path` is the canonical (default-locale) path;
/// localization happens at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub path: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

/// Strip stale "current" markers and re-mark the entries whose localized
/// path matches the request path. Idempotent: annotating twice yields the
/// same marker set as annotating once.
pub fn annotate(items: &mut [MenuItem], locale: &str, current_path: &str) {
    for item in items.iter_mut() {
        item.classes
            .retain(|class| !CURRENT_MARKERS.contains(&class.as_str()));

        if is_current(&item.path, locale, current_path) {
            for marker in CURRENT_MARKERS {
                item.classes.push((*marker).to_string());
            }
        }
    }
}

fn is_current(original_path: &str, locale: &str, current_path: &str) -> bool {
    if locale == DEFAULT_LOCALE {
        return paths_match(original_path, current_path);
    }

    let expected = map_path(original_path, locale);
    if paths_match(&expected, current_path) {
        return true;
    }

    // Root entries also match the bare /{lang} form directly.
    original_path == "/"
        && trim_trailing_slash(current_path) == format!("/{}", lang_tag(locale))
}
