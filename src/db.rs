use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use crate::content::{ContentKind, MetaQuery, LOCALE_META_KEY};
use crate::i18n::{LanguageEntry, LanguageRegistry};
use crate::menu::MenuItem;

/// Settings key holding the language registry (wholesale JSON array).
const LANGUAGES_KEY: &str = "languages";

/// Settings key holding the navigation menu definition.
const MENU_KEY: &str = "menu";

/// One stored content item with its resolved locale tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: i64,
    pub kind: String,
    pub slug: String,
    pub title: String,
    pub locale_tag: Option<String>,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database and ensure the schema exists.
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create settings table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS content (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                slug TEXT NOT NULL,
                title TEXT NOT NULL,
                UNIQUE (kind, slug)
            )",
            [],
        )
        .context("Failed to create content table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS content_meta (
                content_id INTEGER NOT NULL REFERENCES content(id),
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (content_id, key)
            )",
            [],
        )
        .context("Failed to create content_meta table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS installed_locales (
                locale TEXT PRIMARY KEY,
                installed_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create installed_locales table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // ==================== Settings ====================

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context(format!("Failed to read setting '{}'", key))?;
        Ok(value)
    }

    pub fn put_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .context(format!("Failed to write setting '{}'", key))?;
        Ok(())
    }

    /// Load the persisted language registry, or the built-in default for
    /// a fresh installation.
    pub fn load_registry(&self) -> Result<LanguageRegistry> {
        match self.get_setting(LANGUAGES_KEY)? {
            Some(json) => {
                let entries: Vec<LanguageEntry> =
                    serde_json::from_str(&json).context("Stored language registry is corrupt")?;
                LanguageRegistry::from_entries(entries)
                    .context("Stored language registry failed validation")
            }
            None => Ok(LanguageRegistry::default()),
        }
    }

    /// Persist the registry wholesale.
    pub fn save_registry(&self, registry: &LanguageRegistry) -> Result<()> {
        let json = serde_json::to_string(registry.entries())
            .context("Failed to serialize language registry")?;
        self.put_setting(LANGUAGES_KEY, &json)
    }

    /// Load the navigation menu definition, empty when none was saved.
    pub fn load_menu(&self) -> Result<Vec<MenuItem>> {
        match self.get_setting(MENU_KEY)? {
            Some(json) => serde_json::from_str(&json).context("Stored menu is corrupt"),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_menu(&self, items: &[MenuItem]) -> Result<()> {
        let json = serde_json::to_string(items).context("Failed to serialize menu")?;
        self.put_setting(MENU_KEY, &json)
    }

    // ==================== Content ====================

    /// Insert a content item, tagging it with a locale when given.
    pub fn insert_content(
        &self,
        kind: ContentKind,
        slug: &str,
        title: &str,
        locale_tag: Option<&str>,
    ) -> Result<i64> {
        let id = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO content (kind, slug, title) VALUES (?1, ?2, ?3)",
                params![kind.as_str(), slug, title],
            )
            .context(format!("Failed to insert content '{}'", slug))?;
            conn.last_insert_rowid()
        };

        if let Some(tag) = locale_tag {
            self.set_content_meta(id, LOCALE_META_KEY, tag)?;
        }
        Ok(id)
    }

    pub fn set_content_meta(&self, content_id: i64, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO content_meta (content_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(content_id, key) DO UPDATE SET value = excluded.value",
            params![content_id, key, value],
        )
        .context("Failed to write content metadata")?;
        Ok(())
    }

    /// List items of one kind, optionally restricted by a meta predicate.
    /// Rows come back in insert order (the query-natural order).
    pub fn list_content(
        &self,
        kind: ContentKind,
        filter: Option<&MetaQuery>,
    ) -> Result<Vec<ContentItem>> {
        let mut bind: Vec<String> = vec![LOCALE_META_KEY.to_string(), kind.as_str().to_string()];
        let mut sql = String::from(
            "SELECT c.id, c.kind, c.slug, c.title, \
             (SELECT value FROM content_meta m WHERE m.content_id = c.id AND m.key = ?) \
             FROM content c WHERE c.kind = ?",
        );
        if let Some(filter) = filter {
            sql.push_str(" AND ");
            sql.push_str(&filter.to_sql("c", &mut bind));
        }
        sql.push_str(" ORDER BY c.id");

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql).context("Failed to prepare content query")?;
        let rows = stmt
            .query_map(params_from_iter(bind.iter()), |row| {
                Ok(ContentItem {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    slug: row.get(2)?,
                    title: row.get(3)?,
                    locale_tag: row.get(4)?,
                })
            })
            .context("Failed to run content query")?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.context("Failed to read content row")?);
        }
        Ok(items)
    }

    /// Look up one page by slug.
    pub fn get_page_by_slug(&self, slug: &str) -> Result<Option<ContentItem>> {
        let conn = self.conn.lock().unwrap();
        let item = conn
            .query_row(
                "SELECT c.id, c.kind, c.slug, c.title, \
                 (SELECT value FROM content_meta m WHERE m.content_id = c.id AND m.key = ?1) \
                 FROM content c WHERE c.kind = 'page' AND c.slug = ?2",
                params![LOCALE_META_KEY, slug],
                |row| {
                    Ok(ContentItem {
                        id: row.get(0)?,
                        kind: row.get(1)?,
                        slug: row.get(2)?,
                        title: row.get(3)?,
                        locale_tag: row.get(4)?,
                    })
                },
            )
            .optional()
            .context(format!("Failed to look up page '{}'", slug))?;
        Ok(item)
    }

    /// Pages tagged with exactly this locale, in insert order.
    pub fn pages_tagged(&self, locale: &str) -> Result<Vec<ContentItem>> {
        self.list_content(
            ContentKind::Page,
            Some(&MetaQuery::equals(LOCALE_META_KEY, locale)),
        )
    }

    /// Pages whose slug contains the fragment, in insert order.
    pub fn pages_slug_contains(&self, fragment: &str) -> Result<Vec<ContentItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT c.id, c.kind, c.slug, c.title, \
                 (SELECT value FROM content_meta m WHERE m.content_id = c.id AND m.key = ?1) \
                 FROM content c WHERE c.kind = 'page' AND instr(c.slug, ?2) > 0 ORDER BY c.id",
            )
            .context("Failed to prepare slug search")?;
        let rows = stmt
            .query_map(params![LOCALE_META_KEY, fragment], |row| {
                Ok(ContentItem {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    slug: row.get(2)?,
                    title: row.get(3)?,
                    locale_tag: row.get(4)?,
                })
            })
            .context("Failed to run slug search")?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.context("Failed to read content row")?);
        }
        Ok(items)
    }

    // ==================== Installed locales ====================

    pub fn mark_locale_installed(&self, locale: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR IGNORE INTO installed_locales (locale, installed_at) VALUES (?1, ?2)",
            params![locale, now],
        )
        .context(format!("Failed to record installed locale '{}'", locale))?;
        Ok(())
    }

    pub fn is_locale_installed(&self, locale: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM installed_locales WHERE locale = ?1",
            params![locale],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn installed_locales(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT locale FROM installed_locales ORDER BY locale")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut locales = Vec::new();
        for row in rows {
            locales.push(row?);
        }
        Ok(locales)
    }
}
