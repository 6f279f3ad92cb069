//! Permission source abstraction used by the navigation guard

use crate::permission::PermissionEntry;
use crate::token::{SessionIdentity, Token};
use async_trait::async_trait;
use thiserror::Error;

/// Reasons a permission tree could not be loaded
///
/// Cloneable so a single in-flight fetch can report to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No privilege id in the session, log in first")]
    MissingIdentity,

    #[error("Permission request failed: {0}")]
    Transport(String),

    #[error("Permission request rejected with status {status}")]
    Rejected { status: u16 },

    #[error("Malformed permission response: {0}")]
    Malformed(String),
}

/// Loads the permission tree of the signed-in user
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn fetch_permissions(
        &self,
        identity: &SessionIdentity,
        token: &Token,
    ) -> Result<Vec<PermissionEntry>, FetchError>;
}
