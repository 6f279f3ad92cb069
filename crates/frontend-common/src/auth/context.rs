//! Session context: login, logout and permission checks for the view layer

use std::sync::Arc;
use tracing::info;
use warden_core::{
    CoreResult, PermissionEntry, Router, SessionIdentity, Token, TokenStore, is_permitted,
};

/// Credentials handed over by the login page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub token: Token,
    pub priv_id: String,
    pub name: Option<String>,
}

/// Authentication context actions
#[derive(Debug)]
pub enum AuthAction {
    Login(AuthState),
    Logout,
    SetPermissions(Vec<PermissionEntry>),
}

/// Authentication context shared by the application
///
/// Wraps the token store and the router so views can log in, log out and
/// ask whether the current route grants a capability.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<TokenStore>,
    router: Arc<dyn Router>,
}

impl AuthContext {
    pub fn new(store: Arc<TokenStore>, router: Arc<dyn Router>) -> Self {
        Self { store, router }
    }

    /// Apply an action to the session
    ///
    /// # Errors
    ///
    /// Returns an error if session storage rejects a write during login
    pub fn dispatch(&self, action: AuthAction) -> CoreResult<()> {
        match action {
            AuthAction::Login(auth_state) => {
                // A previous session's permission tree must not leak into this one
                self.store.clear();
                self.store.set_token(auth_state.token)?;
                self.store.set_identity(&SessionIdentity {
                    priv_id: Some(auth_state.priv_id),
                    name: auth_state.name,
                })?;
                info!("Logged in");
            }
            AuthAction::Logout => {
                self.store.clear();
                info!("Logged out");
            }
            AuthAction::SetPermissions(permissions) => {
                self.store.set_permission_list(permissions);
            }
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Whether the route at `path` grants `required`
    ///
    /// Unknown paths grant nothing.
    pub fn can(&self, required: &str, path: &str) -> bool {
        self.router
            .resolve(path)
            .is_some_and(|route| is_permitted(required, &route.meta))
    }
}
