//! Warden core types and utilities
//!
//! Domain model shared by the HTTP client and the navigation guard: the
//! token store, the permission tree, route definitions and the matcher that
//! turns one into the other.

pub mod config;
pub mod error;
pub mod fetch;
pub mod matcher;
pub mod navigation;
pub mod notify;
pub mod permission;
pub mod route;
pub mod storage;
#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
pub mod token;

pub use config::{AuthScheme, StorageKeys, WardenConfig};
pub use error::{CoreError, CoreResult};
pub use fetch::{FetchError, PermissionSource};
pub use matcher::{RouteMatcher, match_routes};
pub use navigation::{Location, Navigator};
pub use notify::{LogNotifier, Notification, Notifier};
pub use permission::{PermissionEntry, is_permitted};
pub use route::{RouteDefinition, RouteMeta, RouteTable, Router};
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserSessionStore;
pub use storage::{MemorySessionStore, SessionStore};
pub use token::{SessionIdentity, Token, TokenStore};
