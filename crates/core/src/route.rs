//! Route definitions and the installed route table

use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

/// Metadata carried by a route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Capabilities granted on this route, copied from the permission tree
    #[serde(default)]
    pub permission: Vec<String>,
    /// Route is only reachable with a token
    #[serde(default, rename = "requireAuth")]
    pub require_auth: bool,
}

impl RouteMeta {
    /// Metadata granting the given capabilities
    pub fn with_permission<I, S>(permission: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permission: permission.into_iter().map(Into::into).collect(),
            require_auth: false,
        }
    }
}

/// A statically declared, potentially available route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "metadata")]
    pub meta: RouteMeta,
    #[serde(default)]
    pub children: Vec<RouteDefinition>,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    /// Layout route with an empty path wrapping `children`
    pub fn layout(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self::new("", name).with_children(children)
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Whether this is an empty-path layout route with children
    pub fn is_layout(&self) -> bool {
        self.path.is_empty() && !self.children.is_empty()
    }
}

/// Routing collaborator the navigation guard installs routes into
pub trait Router: Send + Sync {
    /// Register additional routes at runtime
    fn add_routes(&self, routes: Vec<RouteDefinition>);

    /// Find the route a path resolves to
    fn resolve(&self, path: &str) -> Option<RouteDefinition>;
}

/// In-memory route table
///
/// Starts with the constant routes every visitor can reach and grows as the
/// guard installs matched routes. Routes are never removed; installing a
/// top-level route whose path and name are already present replaces it.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: RwLock<Vec<RouteDefinition>>,
}

impl RouteTable {
    pub fn new(constant_routes: Vec<RouteDefinition>) -> Self {
        Self {
            routes: RwLock::new(constant_routes),
        }
    }

    /// Snapshot of every top-level route
    pub fn routes(&self) -> Vec<RouteDefinition> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Metadata of the route `path` resolves to
    pub fn meta_for(&self, path: &str) -> Option<RouteMeta> {
        self.resolve(path).map(|route| route.meta)
    }
}

impl Router for RouteTable {
    fn add_routes(&self, routes: Vec<RouteDefinition>) {
        let mut installed = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        for route in routes {
            match installed
                .iter_mut()
                .find(|existing| existing.path == route.path && existing.name == route.name)
            {
                Some(existing) => *existing = route,
                None => installed.push(route),
            }
        }
        tracing::debug!(total = installed.len(), "Route table updated");
    }

    fn resolve(&self, path: &str) -> Option<RouteDefinition> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        find_route(&routes, "", &normalize(path)).cloned()
    }
}

fn find_route<'a>(
    routes: &'a [RouteDefinition],
    base: &str,
    path: &str,
) -> Option<&'a RouteDefinition> {
    for route in routes {
        let full = join(base, &route.path);
        if !route.is_layout() && full == path {
            return Some(route);
        }
        if let Some(found) = find_route(&route.children, &full, path) {
            return Some(found);
        }
    }
    None
}

/// Join a child segment onto its parent's path; absolute children stand alone
fn join(base: &str, segment: &str) -> String {
    if segment.starts_with('/') {
        normalize(segment)
    } else if segment.is_empty() {
        base.to_string()
    } else {
        normalize(&format!("{}/{segment}", base.trim_end_matches('/')))
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(vec![
            RouteDefinition::new("/", "root"),
            RouteDefinition::new("/login", "login"),
            RouteDefinition::layout(
                "layout",
                vec![
                    RouteDefinition::new("/index", "index"),
                    RouteDefinition::new("/system", "system")
                        .with_children(vec![RouteDefinition::new("users", "system.users")]),
                ],
            ),
        ])
    }

    #[test]
    fn test_resolve_top_level_and_layout_children() {
        let table = table();
        assert_eq!(table.resolve("/login").unwrap().name, "login");
        assert_eq!(table.resolve("/index").unwrap().name, "index");
        assert_eq!(table.resolve("/").unwrap().name, "root");
    }

    #[test]
    fn test_resolve_relative_child_and_trailing_slash() {
        let table = table();
        assert_eq!(table.resolve("/system/users").unwrap().name, "system.users");
        assert_eq!(table.resolve("/system/users/").unwrap().name, "system.users");
    }

    #[test]
    fn test_resolve_unknown_path() {
        assert!(table().resolve("/dashboard").is_none());
    }

    #[test]
    fn test_add_routes_appends_and_replaces() {
        let table = RouteTable::default();
        assert!(table.is_empty());

        table.add_routes(vec![RouteDefinition::new("/resource", "nav.Resource")]);
        table.add_routes(vec![
            RouteDefinition::new("/resource", "nav.Resource")
                .with_meta(RouteMeta::with_permission(["read"])),
            RouteDefinition::new("/report", "nav.Report"),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.meta_for("/resource").unwrap().permission,
            vec!["read".to_string()]
        );
    }

    #[test]
    fn test_route_definition_accepts_metadata_alias() {
        let route: RouteDefinition = serde_json::from_value(serde_json::json!({
            "path": "/resource",
            "name": "nav.Resource",
            "metadata": { "permission": ["read"], "requireAuth": true }
        }))
        .unwrap();
        assert!(route.meta.require_auth);
        assert_eq!(route.meta.permission, vec!["read".to_string()]);
    }
}
