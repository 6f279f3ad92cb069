//! Navigation guard
//!
//! Runs before every navigation. Visitors without a token only reach the
//! whitelist; routes marked `require_auth` send them to the login page.
//! Signed-in users get their routes installed on the first navigation of the
//! session, from the tree already in the session or else a fresh fetch;
//! afterwards only routes the router knows about are reachable.

use crate::loader::PermissionLoader;
use std::sync::Arc;
use tracing::{debug, info, warn};
use warden_core::config::RoutingConfig;
use warden_core::{
    FetchError, Location, PermissionSource, RouteDefinition, RouteMatcher, Router, TokenStore,
};

/// Redirects followed by [`NavigationGuard::navigate`] before giving up
pub const MAX_REDIRECTS: usize = 8;

/// Outcome of a guard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Let the navigation through
    Continue,
    /// Start a new navigation to this location instead
    Redirect(Location),
    /// Cancel the navigation and stay where we are
    Abort,
}

pub struct NavigationGuard {
    store: Arc<TokenStore>,
    router: Arc<dyn Router>,
    loader: PermissionLoader,
    static_routes: Vec<RouteDefinition>,
    routing: RoutingConfig,
    preserve_duplicates: bool,
}

impl NavigationGuard {
    pub fn new(
        store: Arc<TokenStore>,
        router: Arc<dyn Router>,
        source: Arc<dyn PermissionSource>,
        static_routes: Vec<RouteDefinition>,
        routing: RoutingConfig,
    ) -> Self {
        Self {
            store,
            router,
            loader: PermissionLoader::new(source),
            static_routes,
            routing,
            preserve_duplicates: false,
        }
    }

    /// Install a layout route once per matching child
    #[must_use]
    pub const fn preserve_duplicates(mut self) -> Self {
        self.preserve_duplicates = true;
        self
    }

    /// Decide what happens to a navigation from `from` to `to`
    pub async fn before_each(&self, to: &Location, from: &Location) -> Next {
        debug!(to = %to, from = %from, "Guarding navigation");

        if !self.store.is_authenticated() {
            // Root is where rejected visitors are sent, so it must stay reachable
            if self.routing.is_whitelisted(&to.path) || to.path == self.routing.root_path {
                return Next::Continue;
            }
            if self
                .router
                .resolve(&to.path)
                .is_some_and(|route| route.meta.require_auth)
            {
                return Next::Redirect(Location::login(
                    &self.routing.login_path,
                    &self.routing.redirect_param,
                    &to.full_path(),
                ));
            }
            return self.to_root();
        }

        if to.path == self.routing.root_path {
            return Next::Redirect(Location::new(&self.routing.landing_path));
        }

        if !self.store.routes_installed() {
            let installed = self.install_routes().await;

            // Logged out while waiting, e.g. the fetch itself came back 401
            if !self.store.is_authenticated() {
                return Next::Abort;
            }

            return match installed {
                Ok(count) => {
                    info!(routes = count, "Installed permitted routes");
                    // Re-enter so the new routes take part in resolution
                    Next::Redirect(to.clone())
                }
                Err(err) => {
                    warn!(error = %err, "Could not load permissions");
                    self.to_root()
                }
            };
        }

        if self.router.resolve(&to.path).is_some() {
            Next::Continue
        } else {
            debug!(path = %to.path, "No route for path");
            self.to_root()
        }
    }

    /// Run the guard the way a router would, following redirects
    ///
    /// Returns the location the user ends up on, or `None` if the navigation
    /// was aborted or kept redirecting.
    pub async fn navigate(&self, to: Location, from: &Location) -> Option<Location> {
        let mut target = to;
        for _ in 0..=MAX_REDIRECTS {
            match self.before_each(&target, from).await {
                Next::Continue => return Some(target),
                Next::Redirect(location) => target = location,
                Next::Abort => return None,
            }
        }
        warn!(to = %target, "Too many redirects, aborting navigation");
        None
    }

    async fn install_routes(&self) -> Result<usize, FetchError> {
        // A tree handed over by the host is used as is
        let stored = self.store.get_permission_list();
        let permissions = if stored.is_empty() {
            let token = self.store.get_token().ok_or(FetchError::MissingIdentity)?;
            self.loader.load(self.store.identity(), token).await?
        } else {
            debug!(entries = stored.len(), "Using permission tree already in the session");
            Arc::new(stored)
        };

        // A concurrent navigation may have finished the install already
        if self.store.routes_installed() {
            return Ok(0);
        }

        let mut matcher = RouteMatcher::new(&self.static_routes);
        if self.preserve_duplicates {
            matcher = matcher.preserve_duplicates();
        }
        let routes = matcher.match_permissions(&permissions);
        let count = routes.len();

        self.store.set_permission_list(permissions.to_vec());
        self.router.add_routes(routes);
        self.store.mark_routes_installed();
        Ok(count)
    }

    fn to_root(&self) -> Next {
        Next::Redirect(Location::new(&self.routing.root_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use warden_core::{PermissionEntry, RouteMeta, RouteTable, SessionIdentity, Token};

    mock! {
        pub Source {}

        #[async_trait]
        impl PermissionSource for Source {
            async fn fetch_permissions(
                &self,
                identity: &SessionIdentity,
                token: &Token,
            ) -> Result<Vec<PermissionEntry>, FetchError>;
        }
    }

    fn static_routes() -> Vec<RouteDefinition> {
        vec![
            RouteDefinition::new("/resource", "nav.Resource"),
            RouteDefinition::layout(
                "nav.Orders",
                vec![
                    RouteDefinition::new("/orders", "nav.OrderList"),
                    RouteDefinition::new("/returns", "nav.ReturnList"),
                ],
            ),
        ]
    }

    fn signed_in_store() -> Arc<TokenStore> {
        let store = Arc::new(TokenStore::in_memory());
        store.set_token(Token::new("abc")).unwrap();
        store
            .set_identity(&SessionIdentity {
                priv_id: Some("42".into()),
                name: Some("alice".into()),
            })
            .unwrap();
        store
    }

    fn guard(store: &Arc<TokenStore>, source: MockSource) -> (NavigationGuard, Arc<RouteTable>) {
        let router = Arc::new(RouteTable::new(vec![
            RouteDefinition::new("/", "nav.Root"),
            RouteDefinition::new("/login", "nav.Login"),
            RouteDefinition::new("/index", "nav.Index"),
            RouteDefinition::new("/profile", "nav.Profile").with_meta(RouteMeta {
                require_auth: true,
                ..RouteMeta::default()
            }),
        ]));
        let guard = NavigationGuard::new(
            Arc::clone(store),
            router.clone(),
            Arc::new(source),
            static_routes(),
            RoutingConfig::default(),
        );
        (guard, router)
    }

    fn granting_source(times: usize) -> MockSource {
        let mut source = MockSource::new();
        source.expect_fetch_permissions().times(times).returning(|_, _| {
            Ok(vec![
                PermissionEntry::new("/resource", ["read", "outport"]),
                PermissionEntry::new("/orders", ["read"]),
            ])
        });
        source
    }

    fn at(path: &str) -> Location {
        Location::new(path)
    }

    #[tokio::test]
    async fn test_visitor_only_reaches_whitelist() {
        let store = Arc::new(TokenStore::in_memory());
        let (guard, _) = guard(&store, granting_source(0));

        assert_eq!(guard.before_each(&at("/login"), &at("/")).await, Next::Continue);
        assert_eq!(guard.before_each(&at("/"), &at("/")).await, Next::Continue);
        assert_eq!(
            guard.before_each(&at("/dashboard"), &at("/")).await,
            Next::Redirect(at("/"))
        );
    }

    #[tokio::test]
    async fn test_visitor_on_protected_route_is_sent_to_login() {
        let store = Arc::new(TokenStore::in_memory());
        let (guard, _) = guard(&store, granting_source(0));
        let to = Location::parse("/profile?tab=security");

        assert_eq!(
            guard.before_each(&to, &at("/")).await,
            Next::Redirect(Location::login("/login", "redirect", "/profile?tab=security"))
        );
    }

    #[tokio::test]
    async fn test_root_sends_signed_in_user_to_landing() {
        let store = signed_in_store();
        let (guard, _) = guard(&store, granting_source(0));

        assert_eq!(
            guard.before_each(&at("/"), &at("/login")).await,
            Next::Redirect(at("/index"))
        );
    }

    #[tokio::test]
    async fn test_first_navigation_installs_routes_once() {
        let store = signed_in_store();
        let (guard, router) = guard(&store, granting_source(1));
        let to = at("/resource");

        assert_eq!(guard.before_each(&to, &at("/")).await, Next::Redirect(to.clone()));
        assert!(store.routes_installed());
        assert_eq!(store.get_permission_list().len(), 2);
        assert_eq!(
            router.meta_for("/resource"),
            Some(RouteMeta::with_permission(["read", "outport"]))
        );
        assert!(router.resolve("/orders").is_some());

        // Installed now, so no second fetch
        assert_eq!(guard.before_each(&to, &at("/")).await, Next::Continue);
    }

    #[tokio::test]
    async fn test_ungranted_layout_sibling_stays_unreachable() {
        let store = signed_in_store();
        let (guard, router) = guard(&store, granting_source(1));

        assert_eq!(guard.navigate(at("/returns"), &at("/")).await, Some(at("/index")));
        assert!(router.resolve("/orders").is_some());
        assert!(router.resolve("/returns").is_none());
    }

    #[tokio::test]
    async fn test_stored_permission_tree_skips_fetch() {
        let store = signed_in_store();
        store.set_permission_list(vec![PermissionEntry::new("/resource", ["read"])]);
        let (guard, router) = guard(&store, granting_source(0));

        assert_eq!(guard.navigate(at("/resource"), &at("/")).await, Some(at("/resource")));
        assert!(store.routes_installed());
        assert_eq!(
            router.meta_for("/resource"),
            Some(RouteMeta::with_permission(["read"]))
        );
    }

    #[tokio::test]
    async fn test_empty_permission_tree_does_not_refetch() {
        let store = signed_in_store();
        let mut source = MockSource::new();
        source
            .expect_fetch_permissions()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let (guard, _) = guard(&store, source);

        assert_eq!(guard.navigate(at("/resource"), &at("/")).await, Some(at("/index")));
        assert_eq!(guard.navigate(at("/resource"), &at("/")).await, Some(at("/index")));
    }

    #[tokio::test]
    async fn test_concurrent_navigations_fetch_once() {
        struct SlowSource(AtomicUsize);

        #[async_trait]
        impl PermissionSource for SlowSource {
            async fn fetch_permissions(
                &self,
                _identity: &SessionIdentity,
                _token: &Token,
            ) -> Result<Vec<PermissionEntry>, FetchError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(vec![PermissionEntry::new("/resource", ["read"])])
            }
        }

        let store = signed_in_store();
        let source = Arc::new(SlowSource(AtomicUsize::new(0)));
        let guard = NavigationGuard::new(
            Arc::clone(&store),
            Arc::new(RouteTable::default()),
            source.clone(),
            static_routes(),
            RoutingConfig::default(),
        );

        let to = at("/resource");
        let from = at("/");
        let (first, second) = tokio::join!(guard.before_each(&to, &from), guard.before_each(&to, &from));

        assert_eq!(source.0.load(Ordering::SeqCst), 1);
        assert_eq!(first, Next::Redirect(to.clone()));
        assert_eq!(second, Next::Redirect(to));
        assert!(store.routes_installed());
    }

    #[tokio::test]
    async fn test_fetch_failure_redirects_to_root() {
        let store = signed_in_store();
        let mut source = MockSource::new();
        source
            .expect_fetch_permissions()
            .times(1)
            .returning(|_, _| Err(FetchError::Rejected { status: 500 }));
        let (guard, _) = guard(&store, source);

        assert_eq!(
            guard.before_each(&at("/resource"), &at("/")).await,
            Next::Redirect(at("/"))
        );
        assert!(!store.routes_installed());
    }

    #[tokio::test]
    async fn test_logout_during_fetch_aborts() {
        let store = signed_in_store();
        let mut source = MockSource::new();
        let during = Arc::clone(&store);
        source.expect_fetch_permissions().times(1).returning(move |_, _| {
            during.clear();
            Err(FetchError::Rejected { status: 401 })
        });
        let (guard, _) = guard(&store, source);

        assert_eq!(guard.before_each(&at("/resource"), &at("/")).await, Next::Abort);
    }

    #[tokio::test]
    async fn test_unknown_path_redirects_to_root() {
        let store = signed_in_store();
        let (guard, _) = guard(&store, granting_source(1));

        assert_eq!(guard.navigate(at("/missing"), &at("/")).await, Some(at("/index")));
        assert_eq!(
            guard.before_each(&at("/missing"), &at("/")).await,
            Next::Redirect(at("/"))
        );
    }

    #[tokio::test]
    async fn test_navigate_follows_install_redirect() {
        let store = signed_in_store();
        let (guard, _) = guard(&store, granting_source(1));

        assert_eq!(guard.navigate(at("/orders"), &at("/")).await, Some(at("/orders")));
    }

    #[tokio::test]
    async fn test_navigate_gives_up_on_redirect_loop() {
        let store = signed_in_store();
        let router = Arc::new(RouteTable::new(Vec::new()));
        let guard = NavigationGuard::new(
            Arc::clone(&store),
            router,
            Arc::new(granting_source(1)),
            Vec::new(),
            RoutingConfig::default(),
        );

        // Neither root nor landing resolve, so the guard bounces between them
        assert_eq!(guard.navigate(at("/resource"), &at("/")).await, None);
    }
}
