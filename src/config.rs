use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub site_url: String,

    // Storage
    pub database_path: String,

    // Admin
    pub admin_api_key: String,

    // Translation packs
    pub translations_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),

            // Storage
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "langswitch.db".to_string()),

            // Admin - required, protects the registry replace endpoint
            admin_api_key: std::env::var("ADMIN_API_KEY").context("ADMIN_API_KEY not set")?,

            // Translation packs
            translations_api_url: std::env::var("TRANSLATIONS_API_URL").unwrap_or_else(|_| {
                "https://api.wordpress.org/translations/core/1.0/".to_string()
            }),
        })
    }

    /// Join a site-relative path onto the configured site URL.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }
}
