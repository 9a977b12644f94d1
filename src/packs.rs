//! Translation-pack availability and provisioning.
//!
//! The upstream translations endpoint is polled at most once an hour;
//! any failure degrades to "no packs available" rather than surfacing to
//! the caller. Provisioning records successes per entry and reports
//! failures back without blocking the registry save.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::Database;
use crate::i18n::{LanguageEntry, LanguageRegistry, DEFAULT_LOCALE};
use crate::retry::{with_retry, RetryConfig};

/// How long one availability response is reused.
pub const AVAILABILITY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Deserialize)]
struct TranslationsResponse {
    translations: Vec<TranslationPack>,
}

#[derive(Debug, Deserialize)]
struct TranslationPack {
    language: String,
}

/// Outcome of provisioning one registry payload.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
    pub already_installed: Vec<String>,
}

/// Installation/availability status for one registry entry.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageStatus {
    pub locale: String,
    pub installed: bool,
    pub available: bool,
}

pub struct PackService {
    client: reqwest::Client,
    endpoint: String,
    cache: Mutex<Option<(Instant, Vec<String>)>>,
}

impl PackService {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            cache: Mutex::new(None),
        }
    }

    /// Locales the upstream source offers packs for. Served from cache
    /// within the TTL; an unreachable or malformed source yields an
    /// empty set (failures are not cached).
    pub async fn available_locales(&self) -> Vec<String> {
        let mut cache = self.cache.lock().await;
        if let Some((fetched_at, locales)) = cache.as_ref() {
            if fetched_at.elapsed() < AVAILABILITY_CACHE_TTL {
                return locales.clone();
            }
        }

        match self.fetch_available().await {
            Ok(locales) => {
                *cache = Some((Instant::now(), locales.clone()));
                locales
            }
            Err(err) => {
                warn!("translation pack availability check failed: {:#}", err);
                Vec::new()
            }
        }
    }

    async fn fetch_available(&self) -> Result<Vec<String>> {
        let response = with_retry(
            &RetryConfig::pack_api(),
            "translation pack availability",
            || async {
                let response = self
                    .client
                    .get(&self.endpoint)
                    .send()
                    .await
                    .context("Failed to reach translations endpoint")?;

                if !response.status().is_success() {
                    anyhow::bail!("translations endpoint returned {}", response.status());
                }

                response
                    .json::<TranslationsResponse>()
                    .await
                    .context("Failed to parse translations response")
            },
        )
        .await?;

        Ok(response
            .translations
            .into_iter()
            .map(|pack| pack.language)
            .collect())
    }

    /// Whether a pack exists for the locale. The default locale never
    /// needs one.
    pub async fn is_available(&self, locale: &str) -> bool {
        locale == DEFAULT_LOCALE || self.available_locales().await.iter().any(|l| l == locale)
    }

    /// Provision packs for the active entries of a replacement payload.
    ///
    /// A failed entry keeps whatever `active` flag the payload gave it;
    /// the failure is reported, not retried here.
    pub async fn provision(
        &self,
        db: &Database,
        entries: &[LanguageEntry],
    ) -> Result<ProvisionReport> {
        let available = self.available_locales().await;
        let mut report = ProvisionReport::default();

        for entry in entries {
            if !entry.active {
                continue;
            }

            let locale = entry.locale.as_str();
            if locale == DEFAULT_LOCALE || db.is_locale_installed(locale)? {
                report.already_installed.push(locale.to_string());
                continue;
            }

            if available.iter().any(|l| l == locale) {
                db.mark_locale_installed(locale)?;
                info!(locale, "installed translation pack");
                report.installed.push(locale.to_string());
            } else {
                warn!(locale, "translation pack not available");
                report.failed.push(locale.to_string());
            }
        }

        Ok(report)
    }

    /// Per-entry installed/available status for the current registry.
    pub async fn statuses(
        &self,
        db: &Database,
        registry: &LanguageRegistry,
    ) -> Result<Vec<LanguageStatus>> {
        let available = self.available_locales().await;

        registry
            .entries()
            .iter()
            .map(|entry| {
                let locale = entry.locale.as_str();
                Ok(LanguageStatus {
                    locale: locale.to_string(),
                    installed: locale == DEFAULT_LOCALE || db.is_locale_installed(locale)?,
                    available: locale == DEFAULT_LOCALE
                        || available.iter().any(|l| l == locale),
                })
            })
            .collect()
    }
}
