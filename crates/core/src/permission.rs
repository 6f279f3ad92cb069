//! Permission tree returned by the server and the view-layer check

use crate::route::RouteMeta;
use serde::{Deserialize, Serialize};

/// One node of the permission tree the server grants the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub path: String,
    #[serde(default)]
    pub permission: Vec<String>,
    #[serde(default)]
    pub children: Vec<PermissionEntry>,
}

impl PermissionEntry {
    /// Create a leaf entry
    pub fn new<I, S>(path: impl Into<String>, permission: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            permission: permission.into_iter().map(Into::into).collect(),
            children: Vec::new(),
        }
    }

    /// Attach child entries
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Number of entries in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Whether the route metadata grants `required`
///
/// Used by the view layer to show or hide controls such as an export button.
pub fn is_permitted(required: &str, meta: &RouteMeta) -> bool {
    meta.permission.iter().any(|granted| granted == required)
}
