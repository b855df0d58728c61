//! Tab-scoped key/value storage for the admin session flag.
//!
//! SYSTEM CONTEXT
//! ==============
//! In the browser this is `window.sessionStorage`, which disappears with the
//! tab. Only the admin gate writes to it. Storage failures are logged and
//! read back as "absent", which keeps the gate locked.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;
use std::sync::Mutex;

/// Minimal tab-scoped storage used by the admin gate.
pub trait SessionCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn clear(&self, key: &str);
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Process-local session storage for native builds and tests.
#[derive(Default)]
pub struct MemorySessionCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value, as if left behind by an earlier page load in the same tab.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let cache = Self::new();
        cache.set(key, value);
        cache
    }
}

impl SessionCache for MemorySessionCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn clear(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// `window.sessionStorage` backed cache.
///
/// Client-side (hydrate): real storage via `web-sys`.
/// Elsewhere: behaves as empty storage that ignores writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSessionCache;

#[cfg(feature = "hydrate")]
fn session_storage() -> Option<web_sys::Storage> {
    let window = web_sys::window()?;
    match window.session_storage() {
        Ok(storage) => storage,
        Err(e) => {
            tracing::warn!(error = ?e, "session storage unavailable");
            None
        }
    }
}

impl SessionCache for BrowserSessionCache {
    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            match session_storage()?.get_item(key) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = ?e, "session storage read failed");
                    None
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = session_storage() else {
                return;
            };
            if let Err(e) = storage.set_item(key, value) {
                tracing::warn!(key, error = ?e, "session storage write failed");
            }
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn clear(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = session_storage() else {
                return;
            };
            if let Err(e) = storage.remove_item(key) {
                tracing::warn!(key, error = ?e, "session storage remove failed");
            }
        }
    }
}
