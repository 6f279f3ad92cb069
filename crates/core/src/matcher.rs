//! Permission-driven route matching
//!
//! Walks the permission tree depth-first (children before their parent) and
//! picks the static routes the user may reach. A permission path can match a
//! top-level route directly, or a child of an empty-path layout route, in
//! which case the layout route is what gets installed, carrying only the
//! children that were granted. Matched routes are returned as annotated
//! copies; the static table is left untouched.

use crate::permission::PermissionEntry;
use crate::route::RouteDefinition;
use std::collections::HashSet;
use tracing::debug;

/// Match a permission tree against the static route table
pub fn match_routes(
    permission: &[PermissionEntry],
    static_routes: &[RouteDefinition],
) -> Vec<RouteDefinition> {
    RouteMatcher::new(static_routes).match_permissions(permission)
}

/// Configurable matcher over a static route table
#[derive(Debug, Clone, Copy)]
pub struct RouteMatcher<'a> {
    static_routes: &'a [RouteDefinition],
    dedupe: bool,
}

impl<'a> RouteMatcher<'a> {
    pub const fn new(static_routes: &'a [RouteDefinition]) -> Self {
        Self {
            static_routes,
            dedupe: true,
        }
    }

    /// Report a layout route once per matching child instead of once overall
    #[must_use]
    pub const fn preserve_duplicates(mut self) -> Self {
        self.dedupe = false;
        self
    }

    /// Annotated copies of the top-level routes granted by `permission`, in
    /// first-match order
    pub fn match_permissions(&self, permission: &[PermissionEntry]) -> Vec<RouteDefinition> {
        let mut working = self.static_routes.to_vec();
        let mut matched = Vec::new();
        collect(permission, &mut working, &mut matched);

        let mut seen = HashSet::new();
        matched
            .into_iter()
            .filter(|index| !self.dedupe || seen.insert(*index))
            .map(|index| granted(&working[index]))
            .collect()
    }
}

/// Copy of a matched route; layouts keep only their annotated children
fn granted(route: &RouteDefinition) -> RouteDefinition {
    let mut route = route.clone();
    if route.is_layout() {
        route
            .children
            .retain(|child| !child.meta.permission.is_empty());
    }
    route
}

fn collect(entries: &[PermissionEntry], working: &mut [RouteDefinition], matched: &mut Vec<usize>) {
    for entry in entries {
        if !entry.children.is_empty() {
            collect(&entry.children, working, matched);
        }

        // Installed routes must carry the capabilities they were granted
        if entry.permission.is_empty() {
            debug!(path = %entry.path, "Skipping permission entry without capabilities");
            continue;
        }

        let before = matched.len();
        for (index, route) in working.iter_mut().enumerate() {
            if route.is_layout() {
                for child in route.children.iter_mut().filter(|child| child.path == entry.path) {
                    child.meta.permission.clone_from(&entry.permission);
                    matched.push(index);
                }
            }
            if route.path == entry.path {
                route.meta.permission.clone_from(&entry.permission);
                matched.push(index);
            }
        }

        if matched.len() == before {
            debug!(path = %entry.path, "No static route for permission entry");
        }
    }
}
