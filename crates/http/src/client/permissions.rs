//! Permission tree endpoint

use super::WardenClient;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};
use warden_core::config::PermissionsConfig;
use warden_core::{FetchError, PermissionEntry, PermissionSource, SessionIdentity, Token, TokenStore};

#[derive(Debug, Deserialize)]
struct PrivilegeResponse {
    cust: Customer,
}

#[derive(Debug, Deserialize)]
struct Customer {
    #[serde(default)]
    privileges: Vec<PermissionEntry>,
}

impl PrivilegeResponse {
    /// The tree lives under the children of the first privilege root
    fn into_permissions(self) -> Result<Vec<PermissionEntry>, FetchError> {
        self.cust
            .privileges
            .into_iter()
            .next()
            .map(|root| root.children)
            .ok_or_else(|| FetchError::Malformed("response has no privilege root".into()))
    }
}

/// Fetches the permission tree over HTTP and records it in the token store
#[derive(Clone)]
pub struct HttpPermissionSource {
    client: WardenClient,
    store: Arc<TokenStore>,
    endpoint: String,
}

impl HttpPermissionSource {
    pub fn new(client: WardenClient, store: Arc<TokenStore>, config: &PermissionsConfig) -> Self {
        Self {
            client,
            store,
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl PermissionSource for HttpPermissionSource {
    async fn fetch_permissions(
        &self,
        identity: &SessionIdentity,
        token: &Token,
    ) -> Result<Vec<PermissionEntry>, FetchError> {
        let priv_id = identity
            .priv_id
            .as_deref()
            .ok_or(FetchError::MissingIdentity)?;

        let mut request = self
            .client
            .request(Method::GET, &self.endpoint)
            .query(&[("id", priv_id)])
            .header("token", token.as_str());
        if let Some(name) = &identity.name {
            request = request.header("name", name.as_str());
        }

        let response: PrivilegeResponse = self.client.execute(request).await.map_err(|err| {
            warn!(error = %err, "Failed to fetch permissions");
            FetchError::from(err)
        })?;
        let permissions = response.into_permissions()?;

        debug!(entries = permissions.len(), "Fetched permission tree");
        self.store.set_permission_list(permissions.clone());
        Ok(permissions)
    }
}
