//! Meta-query composition: typed predicate trees over per-item metadata.
//!
//! Content items carry free-form key/value metadata rows. A `MetaQuery`
//! describes a predicate over that metadata and renders to parameterized
//! SQL against the `content_meta` table, so composed filters never touch
//! string interpolation.

/// Comparison applied to one metadata key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compare {
    /// The key exists with exactly this value.
    Equals(String),
    /// No row for the key exists at all.
    NotExists,
}

/// Predicate tree over content metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaQuery {
    Clause { key: String, compare: Compare },
    /// Disjunction of sub-predicates.
    Any(Vec<MetaQuery>),
    /// Conjunction of sub-predicates.
    All(Vec<MetaQuery>),
}

impl MetaQuery {
    /// Shorthand for an equality clause.
    pub fn equals(key: &str, value: &str) -> Self {
        MetaQuery::Clause {
            key: key.to_string(),
            compare: Compare::Equals(value.to_string()),
        }
    }

    /// Shorthand for a key-absent clause.
    pub fn not_exists(key: &str) -> Self {
        MetaQuery::Clause {
            key: key.to_string(),
            compare: Compare::NotExists,
        }
    }

    /// Render to a SQL fragment over `content_meta`, pushing bind values
    /// onto `params` in placeholder order. `alias` names the content row
    /// the subqueries correlate with.
    pub fn to_sql(&self, alias: &str, params: &mut Vec<String>) -> String {
        match self {
            MetaQuery::Clause { key, compare } => match compare {
                Compare::Equals(value) => {
                    params.push(key.clone());
                    params.push(value.clone());
                    format!(
                        "EXISTS (SELECT 1 FROM content_meta m WHERE m.content_id = {}.id \
                         AND m.key = ? AND m.value = ?)",
                        alias
                    )
                }
                Compare::NotExists => {
                    params.push(key.clone());
                    format!(
                        "NOT EXISTS (SELECT 1 FROM content_meta m WHERE m.content_id = {}.id \
                         AND m.key = ?)",
                        alias
                    )
                }
            },
            MetaQuery::Any(parts) => combine(parts, " OR ", "0 = 1", alias, params),
            MetaQuery::All(parts) => combine(parts, " AND ", "1 = 1", alias, params),
        }
    }
}

fn combine(
    parts: &[MetaQuery],
    joiner: &str,
    empty: &str,
    alias: &str,
    params: &mut Vec<String>,
) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    let rendered: Vec<String> = parts.iter().map(|p| p.to_sql(alias, params)).collect();
    format!("({})", rendered.join(joiner))
}
