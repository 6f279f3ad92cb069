//! Session context and navigation guard for Warden applications

pub mod auth;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod guard;
pub mod loader;
pub mod session;

pub use auth::{AuthAction, AuthContext, AuthState};
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserNavigator;
pub use guard::{MAX_REDIRECTS, NavigationGuard, Next};
pub use loader::PermissionLoader;
pub use session::Warden;
