//! Token store shared by the HTTP interceptors and the navigation guard

use crate::config::StorageKeys;
use crate::error::CoreResult;
use crate::permission::PermissionEntry;
use crate::storage::{MemorySessionStore, SessionStore};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Opaque authentication credential
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifiers kept next to the token in session storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity {
    pub priv_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    permissions: Vec<PermissionEntry>,
    routes_installed: bool,
}

/// Current token, session identity and permission tree
///
/// The token and identity are persisted through a [`SessionStore`] and read
/// on demand; the permission tree lives in memory.
pub struct TokenStore {
    storage: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("authenticated", &self.get_token().is_some())
            .finish_non_exhaustive()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl TokenStore {
    pub fn new(storage: Arc<dyn SessionStore>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Current token, if a non-empty one is stored
    pub fn get_token(&self) -> Option<Token> {
        self.storage
            .get(StorageKeys::TOKEN)
            .filter(|value| !value.is_empty())
            .map(Token)
    }

    /// Replace the current token
    ///
    /// # Errors
    ///
    /// Returns an error if session storage rejects the write
    pub fn set_token(&self, token: Token) -> CoreResult<()> {
        self.storage.set(StorageKeys::TOKEN, token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            priv_id: self.storage.get(StorageKeys::PRIV_ID),
            name: self.storage.get(StorageKeys::NAME),
        }
    }

    /// Persist the session identifiers; `None` fields are removed
    ///
    /// # Errors
    ///
    /// Returns an error if session storage rejects the write
    pub fn set_identity(&self, identity: &SessionIdentity) -> CoreResult<()> {
        for (key, value) in [
            (StorageKeys::PRIV_ID, &identity.priv_id),
            (StorageKeys::NAME, &identity.name),
        ] {
            match value {
                Some(value) => self.storage.set(key, value)?,
                None => self.storage.remove(key),
            }
        }
        Ok(())
    }

    pub fn get_permission_list(&self) -> Vec<PermissionEntry> {
        self.read_state().permissions.clone()
    }

    pub fn set_permission_list(&self, permissions: Vec<PermissionEntry>) {
        self.write_state().permissions = permissions;
    }

    /// Whether the matched routes have been handed to the router this session
    pub fn routes_installed(&self) -> bool {
        self.read_state().routes_installed
    }

    pub fn mark_routes_installed(&self) {
        self.write_state().routes_installed = true;
    }

    /// Log out: drop the token, identity and permission tree
    pub fn clear(&self) {
        self.storage.remove(StorageKeys::TOKEN);
        self.storage.remove(StorageKeys::PRIV_ID);
        self.storage.remove(StorageKeys::NAME);
        *self.write_state() = SessionState::default();
        info!("Session cleared");
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
