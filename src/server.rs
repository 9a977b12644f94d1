//! HTTP surface: the router, shared state, and request handlers.
//!
//! Visitor-facing paths never fail on locale logic; resolution and
//! filtering degrade to the hard default. Only the two admin operations
//! return explicit errors.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::content::{query_filter, ContentKind, QueryContext, QueryOrigin};
use crate::db::Database;
use crate::i18n::{self, home, urlmap, LanguageEntry, LanguageRegistry, LocaleStore};
use crate::menu::{self, MenuItem};
use crate::packs::{PackService, ProvisionReport};
use crate::security;

/// Query parameter that triggers an explicit locale switch.
pub const SWITCH_PARAM: &str = "switch_lang";

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub registry: Arc<RwLock<LanguageRegistry>>,
    pub packs: Arc<PackService>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Result<Self> {
        let registry = db.load_registry()?;
        let packs = PackService::new(&config.translations_api_url);
        Ok(Self {
            db,
            config: Arc::new(config),
            registry: Arc::new(RwLock::new(registry)),
            packs: Arc::new(packs),
        })
    }

    fn registry(&self) -> LanguageRegistry {
        self.registry.read().unwrap().clone()
    }
}

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/language", post(set_language))
        .route("/api/admin/languages", post(replace_languages))
        .route("/api/admin/languages/status", get(language_status))
        .route("/api/content/:kind", get(list_content))
        .route("/api/menu", get(get_menu))
        .route("/", get(serve_page))
        .route("/*path", get(serve_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Errors ====================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    InvalidPayload(String),

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Internal(err) => {
                error!("internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ==================== Cookie plumbing ====================

fn store_from_jar(jar: &CookieJar) -> LocaleStore {
    LocaleStore::from_cookie(jar.get(i18n::COOKIE_NAME).map(|c| c.value().to_string()))
}

/// Flush a pending store write as a Set-Cookie on the response jar.
fn apply_store(jar: CookieJar, store: &LocaleStore) -> CookieJar {
    match store.pending_write() {
        Some(value) => jar.add(
            Cookie::build((i18n::COOKIE_NAME, value.to_string()))
                .path("/")
                .max_age(time::Duration::days(i18n::COOKIE_MAX_AGE_DAYS))
                .same_site(SameSite::Lax)
                .build(),
        ),
        None => jar,
    }
}

// ==================== System ====================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ==================== Switcher display ====================

#[derive(Debug, Serialize)]
struct LanguagesResponse {
    current: String,
    languages: Vec<LanguageEntry>,
}

async fn list_languages(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let registry = state.registry();
    let mut store = store_from_jar(&jar);
    let current = i18n::resolve(&mut store, None, &registry);

    Json(LanguagesResponse {
        current,
        languages: registry.active_entries().into_iter().cloned().collect(),
    })
}

// ==================== Set active locale ====================

#[derive(Debug, Deserialize)]
struct SetLanguageRequest {
    locale: String,
}

#[derive(Debug, Serialize)]
struct SetLanguageResponse {
    locale: String,
    home_url: String,
}

async fn set_language(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SetLanguageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = store_from_jar(&jar);
    store.set(&request.locale);

    let home_path = home::find_home(&state.db, &request.locale)?;
    let jar = apply_store(jar, &store);

    info!(locale = %request.locale, "locale switched");
    Ok((
        jar,
        Json(SetLanguageResponse {
            locale: request.locale,
            home_url: state.config.absolute_url(&home_path),
        }),
    ))
}

// ==================== Admin: replace registry ====================

#[derive(Debug, Deserialize)]
struct ReplaceLanguagesRequest {
    languages: Vec<LanguageEntry>,
}

#[derive(Debug, Serialize)]
struct ReplaceLanguagesResponse {
    saved: usize,
    packs: ProvisionReport,
}

async fn replace_languages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ReplaceLanguagesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !security::verify_admin_key(&headers, &state.config.admin_api_key) {
        return Err(ApiError::Unauthorized);
    }

    // Wholesale validation; nothing is applied on failure.
    let registry = LanguageRegistry::from_entries(request.languages)
        .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

    // Provisioning failures are reported but never block the save.
    let report = state.packs.provision(&state.db, registry.entries()).await?;

    state.db.save_registry(&registry)?;
    let saved = registry.entries().len();
    *state.registry.write().unwrap() = registry;

    info!(saved, failed = report.failed.len(), "language registry replaced");
    Ok(Json(ReplaceLanguagesResponse {
        saved,
        packs: report,
    }))
}

// ==================== Admin: language status ====================

async fn language_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if !security::verify_admin_key(&headers, &state.config.admin_api_key) {
        return Err(ApiError::Unauthorized);
    }

    let registry = state.registry();
    let statuses = state.packs.statuses(&state.db, &registry).await?;
    Ok(Json(serde_json::json!({ "statuses": statuses })))
}

// ==================== Content listing ====================

#[derive(Debug, Deserialize)]
struct ContentQuery {
    /// Secondary display context: "list" (filtered) or "plain".
    widget: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContentResponse {
    locale: String,
    items: Vec<ContentItemResponse>,
}

#[derive(Debug, Serialize)]
struct ContentItemResponse {
    slug: String,
    title: String,
    locale_tag: Option<String>,
}

async fn list_content(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(kind): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = ContentKind::from_str(&kind).ok_or(ApiError::NotFound)?;

    let registry = state.registry();
    let mut store = store_from_jar(&jar);
    let locale = i18n::resolve(&mut store, None, &registry);

    let origin = match query.widget.as_deref() {
        Some("list") => QueryOrigin::Widget { list_style: true },
        Some(_) => QueryOrigin::Widget { list_style: false },
        None => QueryOrigin::Main,
    };
    let ctx = QueryContext { kind, origin };
    let filter = query_filter(&ctx, None, &locale);

    let items = state.db.list_content(kind, filter.as_ref())?;
    Ok(Json(ContentResponse {
        locale,
        items: items
            .into_iter()
            .map(|item| ContentItemResponse {
                slug: item.slug,
                title: item.title,
                locale_tag: item.locale_tag,
            })
            .collect(),
    }))
}

// ==================== Menu ====================

#[derive(Debug, Deserialize)]
struct MenuQuery {
    /// The request path menu entries are compared against.
    current: Option<String>,
}

#[derive(Debug, Serialize)]
struct MenuResponse {
    locale: String,
    items: Vec<MenuItemResponse>,
}

#[derive(Debug, Serialize)]
struct MenuItemResponse {
    title: String,
    path: String,
    classes: Vec<String>,
}

async fn get_menu(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<MenuQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let registry = state.registry();
    let mut store = store_from_jar(&jar);
    let locale = i18n::resolve(&mut store, None, &registry);

    let mut items: Vec<MenuItem> = state.db.load_menu()?;
    let current = query.current.as_deref().unwrap_or("/");
    menu::annotate(&mut items, &locale, current);

    Ok(Json(MenuResponse {
        items: items
            .into_iter()
            .map(|item| MenuItemResponse {
                path: urlmap::map_path(&item.path, &locale),
                title: item.title,
                classes: item.classes,
            })
            .collect(),
        locale,
    }))
}

// ==================== Page serving ====================

#[derive(Debug, Deserialize)]
struct PageQuery {
    switch_lang: Option<String>,
}

#[derive(Debug, Serialize)]
struct PageResponse {
    slug: String,
    title: String,
    locale_tag: Option<String>,
    resolved_locale: String,
}

/// Drop the switch parameter from a raw query string, keeping the rest
/// byte-for-byte.
fn strip_switch_param(raw_query: &str) -> String {
    raw_query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or(pair);
            key != SWITCH_PARAM
        })
        .collect::<Vec<_>>()
        .join("&")
}

async fn serve_page(
    State(state): State<AppState>,
    jar: CookieJar,
    path: Option<Path<String>>,
    Query(query): Query<PageQuery>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let path = match path {
        Some(Path(p)) => format!("/{}", p),
        None => "/".to_string(),
    };

    let registry = state.registry();
    let mut store = store_from_jar(&jar);

    // Explicit switch: persist, then bounce back to the clean URL.
    if let Some(locale) = query.switch_lang.as_deref() {
        i18n::resolve(&mut store, Some(locale), &registry);
        let jar = apply_store(jar, &store);

        let remaining = strip_switch_param(uri.query().unwrap_or(""));
        let target = if remaining.is_empty() {
            path
        } else {
            format!("{}?{}", path, remaining)
        };
        info!(locale, target = %target, "switch requested, redirecting");
        return Ok((jar, Redirect::to(&target)).into_response());
    }

    let resolved = i18n::resolve(&mut store, None, &registry);

    if path == "/" {
        return Ok(Json(serde_json::json!({
            "slug": "",
            "resolved_locale": resolved,
        }))
        .into_response());
    }

    let slug = path.trim_start_matches('/');
    let page = state.db.get_page_by_slug(slug)?.ok_or(ApiError::NotFound)?;

    // Viewing a page tagged for a specific locale pulls the stored
    // preference along with it.
    i18n::sync_with_page(&mut store, page.locale_tag.as_deref(), &registry);
    let resolved = store.get().unwrap_or(resolved.as_str()).to_string();

    let jar = apply_store(jar, &store);
    Ok((
        jar,
        Json(PageResponse {
            slug: page.slug,
            title: page.title,
            locale_tag: page.locale_tag,
            resolved_locale: resolved,
        }),
    )
        .into_response())
}
