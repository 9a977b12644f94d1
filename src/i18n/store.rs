//! Locale store: the visitor's persisted locale preference.
//!
//! The store is a request-scoped view over one client cookie. It is built
//! from the incoming request, mutated at most a couple of times while the
//! request is handled, and any pending write is flushed as a `Set-Cookie`
//! header by the server layer. Concurrent requests from the same client
//! race with last-write-wins semantics; the value is a UI preference, so
//! that is acceptable.

/// Cookie holding the resolved locale.
pub const COOKIE_NAME: &str = "langswitch_locale";

/// Cookie lifetime in days.
pub const COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Request-scoped locale preference backed by a client cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStore {
    current: Option<String>,
    pending_write: Option<String>,
}

impl LocaleStore {
    /// Build the store from the incoming cookie value, if any.
    pub fn from_cookie(value: Option<String>) -> Self {
        Self {
            current: value,
            pending_write: None,
        }
    }

    /// The stored locale as seen by the current request.
    pub fn get(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Persist a locale: visible immediately within this request and
    /// queued for the response cookie.
    pub fn set(&mut self, locale: &str) {
        self.current = Some(locale.to_string());
        self.pending_write = Some(locale.to_string());
    }

    /// The value to write back as a cookie, if any write happened.
    pub fn pending_write(&self) -> Option<&str> {
        self.pending_write.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_has_no_value_and_no_write() {
        let store = LocaleStore::from_cookie(None);
        assert_eq!(store.get(), None);
        assert_eq!(store.pending_write(), None);
    }

    #[test]
    fn test_incoming_cookie_is_visible_without_write() {
        let store = LocaleStore::from_cookie(Some("it_IT".to_string()));
        assert_eq!(store.get(), Some("it_IT"));
        assert_eq!(store.pending_write(), None);
    }

    #[test]
    fn test_set_is_visible_within_request() {
        let mut store = LocaleStore::from_cookie(Some("en_US".to_string()));
        store.set("it_IT");
        assert_eq!(store.get(), Some("it_IT"));
        assert_eq!(store.pending_write(), Some("it_IT"));
    }

    #[test]
    fn test_last_set_wins() {
        let mut store = LocaleStore::from_cookie(None);
        store.set("it_IT");
        store.set("sq_AL");
        assert_eq!(store.get(), Some("sq_AL"));
        assert_eq!(store.pending_write(), Some("sq_AL"));
    }
}
