//! Content filter: restricts list queries to items visible under the
//! resolved locale.
//!
//! An item is visible when its locale tag equals the resolved locale,
//! equals the "all" sentinel, or is absent entirely. Whether the filter
//! applies at all is decided from an explicit `QueryContext` supplied by
//! the caller; there is no inspection of where a query "looks like" it
//! came from.

use crate::content::{MetaQuery, ALL_LOCALES_TAG, LOCALE_META_KEY};

/// What kind of content a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Product,
    Category,
    Page,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Product => "product",
            ContentKind::Category => "category",
            ContentKind::Page => "page",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "post" => Some(ContentKind::Post),
            "product" => Some(ContentKind::Product),
            "category" => Some(ContentKind::Category),
            "page" => Some(ContentKind::Page),
            _ => None,
        }
    }
}

/// Where the query originates. Callers declare this instead of the
/// filter guessing from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrigin {
    /// The primary list query for the request.
    Main,
    /// A secondary display context (widget, carousel, sidebar block).
    /// Only list-style widgets are locale-filtered.
    Widget { list_style: bool },
    /// Administrative listing; never filtered.
    Admin,
}

/// Explicit capability flags for one content query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryContext {
    pub kind: ContentKind,
    pub origin: QueryOrigin,
}

impl QueryContext {
    pub fn main(kind: ContentKind) -> Self {
        Self {
            kind,
            origin: QueryOrigin::Main,
        }
    }

    pub fn widget(kind: ContentKind, list_style: bool) -> Self {
        Self {
            kind,
            origin: QueryOrigin::Widget { list_style },
        }
    }

    pub fn admin(kind: ContentKind) -> Self {
        Self {
            kind,
            origin: QueryOrigin::Admin,
        }
    }

    /// Whether locale filtering applies to this query. Pages and admin
    /// queries are exempt; widgets only participate when list-style.
    pub fn locale_filtered(&self) -> bool {
        if self.kind == ContentKind::Page {
            return false;
        }
        match self.origin {
            QueryOrigin::Main => true,
            QueryOrigin::Widget { list_style } => list_style,
            QueryOrigin::Admin => false,
        }
    }
}

/// The visibility disjunction for a locale:
/// tag == locale OR tag == "all" OR tag absent.
pub fn locale_visibility(locale: &str) -> MetaQuery {
    MetaQuery::Any(vec![
        MetaQuery::equals(LOCALE_META_KEY, locale),
        MetaQuery::equals(LOCALE_META_KEY, ALL_LOCALES_TAG),
        MetaQuery::not_exists(LOCALE_META_KEY),
    ])
}

/// Combine an existing predicate with the locale disjunction:
/// `existing AND (disjunction)`, or the disjunction alone.
pub fn augment_query(existing: Option<MetaQuery>, locale: &str) -> MetaQuery {
    let visibility = locale_visibility(locale);
    match existing {
        Some(predicate) => MetaQuery::All(vec![predicate, visibility]),
        None => visibility,
    }
}

/// The filter for one query, honoring its context. `None` means the
/// query runs unfiltered.
pub fn query_filter(
    ctx: &QueryContext,
    existing: Option<MetaQuery>,
    locale: &str,
) -> Option<MetaQuery> {
    if ctx.locale_filtered() {
        Some(augment_query(existing, locale))
    } else {
        existing
    }
}

/// Single-item visibility check against the resolved locale.
pub fn should_show(tag: Option<&str>, locale: &str) -> bool {
    match tag {
        None => true,
        Some(tag) if tag == ALL_LOCALES_TAG => true,
        Some(tag) => tag == locale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Context Tests ====================

    #[test]
    fn test_main_query_filtered_for_non_pages() {
        assert!(QueryContext::main(ContentKind::Post).locale_filtered());
        assert!(QueryContext::main(ContentKind::Product).locale_filtered());
        assert!(QueryContext::main(ContentKind::Category).locale_filtered());
    }

    #[test]
    fn test_pages_never_filtered() {
        assert!(!QueryContext::main(ContentKind::Page).locale_filtered());
        assert!(!QueryContext::widget(ContentKind::Page, true).locale_filtered());
    }

    #[test]
    fn test_admin_never_filtered() {
        assert!(!QueryContext::admin(ContentKind::Post).locale_filtered());
        assert!(!QueryContext::admin(ContentKind::Product).locale_filtered());
    }

    #[test]
    fn test_widget_filtered_only_when_list_style() {
        assert!(QueryContext::widget(ContentKind::Product, true).locale_filtered());
        assert!(!QueryContext::widget(ContentKind::Product, false).locale_filtered());
    }

    // ==================== Composition Tests ====================

    #[test]
    fn test_visibility_is_three_way_disjunction() {
        let query = locale_visibility("it_IT");
        match query {
            MetaQuery::Any(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0], MetaQuery::equals(LOCALE_META_KEY, "it_IT"));
                assert_eq!(parts[1], MetaQuery::equals(LOCALE_META_KEY, "all"));
                assert_eq!(parts[2], MetaQuery::not_exists(LOCALE_META_KEY));
            }
            other => panic!("expected disjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_augment_without_existing_is_just_disjunction() {
        assert_eq!(augment_query(None, "it_IT"), locale_visibility("it_IT"));
    }

    #[test]
    fn test_augment_with_existing_conjoins() {
        let existing = MetaQuery::equals("featured", "yes");
        let combined = augment_query(Some(existing.clone()), "it_IT");
        assert_eq!(
            combined,
            MetaQuery::All(vec![existing, locale_visibility("it_IT")])
        );
    }

    #[test]
    fn test_query_filter_passes_existing_through_when_exempt() {
        let existing = MetaQuery::equals("featured", "yes");
        let ctx = QueryContext::admin(ContentKind::Post);
        assert_eq!(
            query_filter(&ctx, Some(existing.clone()), "it_IT"),
            Some(existing)
        );

        let ctx = QueryContext::main(ContentKind::Page);
        assert_eq!(query_filter(&ctx, None, "it_IT"), None);
    }

    // ==================== should_show Tests ====================

    #[test]
    fn test_untagged_and_all_always_visible() {
        assert!(should_show(None, "it_IT"));
        assert!(should_show(None, "en_US"));
        assert!(should_show(Some("all"), "it_IT"));
        assert!(should_show(Some("all"), "sq_AL"));
    }

    #[test]
    fn test_tagged_visible_only_under_matching_locale() {
        assert!(should_show(Some("it_IT"), "it_IT"));
        assert!(!should_show(Some("it_IT"), "en_US"));
        assert!(!should_show(Some("en_US"), "it_IT"));
    }
}
