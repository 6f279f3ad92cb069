//! Session storage backends for the token and session identifiers

#[cfg(target_arch = "wasm32")]
use crate::error::CoreError;
use crate::error::CoreResult;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Key/value storage scoped to the browser session
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str);
}

/// Process-local storage, used on native targets and in tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// `window.sessionStorage`
///
/// The handle is looked up on every call, so the store itself holds no JS
/// values and can be shared freely.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStore;

#[cfg(target_arch = "wasm32")]
impl BrowserSessionStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.session_storage().ok().flatten())
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|storage| storage.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let storage =
            Self::storage().ok_or_else(|| CoreError::storage("sessionStorage is not available"))?;
        storage
            .set_item(key, value)
            .map_err(|err| CoreError::storage(format!("failed to write {key}: {err:?}")))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("token"), None);

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").as_deref(), Some("abc"));

        store.remove("token");
        assert_eq!(store.get("token"), None);
    }
}
