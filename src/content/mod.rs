//! Content visibility: metadata predicates and the locale filter.
//!
//! - `query`: typed meta-query trees that render to parameterized SQL
//! - `filter`: the locale visibility disjunction, its composition with
//!   existing predicates, and the explicit query-context flags

mod filter;
mod query;

pub use filter::{
    augment_query, locale_visibility, query_filter, should_show, ContentKind, QueryContext,
    QueryOrigin,
};
pub use query::{Compare, MetaQuery};

/// Metadata key carrying an item's locale tag.
pub const LOCALE_META_KEY: &str = "language_locale";

/// Sentinel tag meaning "visible under every locale".
pub const ALL_LOCALES_TAG: &str = "all";
