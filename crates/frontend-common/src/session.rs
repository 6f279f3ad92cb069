//! Wiring of the token store, client, guard and context for one application

use crate::auth::AuthContext;
use crate::guard::NavigationGuard;
use std::sync::Arc;
use warden_core::{
    Navigator, Notifier, RouteDefinition, RouteTable, SessionStore, TokenStore, WardenConfig,
};
use warden_http::{ClientError, HttpPermissionSource, WardenClient};

/// Everything an application needs, sharing one token store and route table
pub struct Warden {
    config: WardenConfig,
    store: Arc<TokenStore>,
    router: Arc<RouteTable>,
    client: WardenClient,
    guard: NavigationGuard,
    auth: AuthContext,
}

impl Warden {
    /// Wire up a session
    ///
    /// `constant_routes` are reachable by everyone from the start;
    /// `static_routes` are the candidates the permission tree is matched
    /// against.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`,
    /// e.g. `http.base_url` is empty outside the browser
    pub fn new(
        config: WardenConfig,
        storage: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        constant_routes: Vec<RouteDefinition>,
        static_routes: Vec<RouteDefinition>,
    ) -> Result<Self, ClientError> {
        let store = Arc::new(TokenStore::new(storage));
        let router = Arc::new(RouteTable::new(constant_routes));

        let client = WardenClient::builder()
            .http_config(&config.http)
            .with_auth(&store, navigator, notifier, &config)?
            .build()?;

        let source = HttpPermissionSource::new(client.clone(), Arc::clone(&store), &config.permissions);
        let guard = NavigationGuard::new(
            Arc::clone(&store),
            router.clone(),
            Arc::new(source),
            static_routes,
            config.routing.clone(),
        );
        let auth = AuthContext::new(Arc::clone(&store), router.clone());

        Ok(Self {
            config,
            store,
            router,
            client,
            guard,
            auth,
        })
    }

    pub const fn config(&self) -> &WardenConfig {
        &self.config
    }

    pub const fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    pub const fn router(&self) -> &Arc<RouteTable> {
        &self.router
    }

    pub const fn client(&self) -> &WardenClient {
        &self.client
    }

    pub const fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub const fn auth(&self) -> &AuthContext {
        &self.auth
    }
}
