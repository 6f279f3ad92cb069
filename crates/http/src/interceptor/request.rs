//! Authorization header injection

use super::RequestInterceptor;
use crate::client::error::ClientError;
use reqwest::header::{HeaderName, HeaderValue};
use std::sync::Arc;
use warden_core::config::AuthConfig;
use warden_core::{AuthScheme, TokenStore};

/// Writes the current token into the configured header
///
/// Requests sent without a token, or after the store was cleared, go out
/// without the header.
pub struct AuthHeaderInterceptor {
    store: Arc<TokenStore>,
    scheme: AuthScheme,
    header: HeaderName,
}

impl AuthHeaderInterceptor {
    /// # Errors
    ///
    /// Returns an error if the configured header name is invalid
    pub fn new(store: Arc<TokenStore>, config: &AuthConfig) -> Result<Self, ClientError> {
        let header = HeaderName::from_bytes(config.header.as_bytes()).map_err(|_| {
            ClientError::Configuration(format!("invalid auth header name: {}", config.header))
        })?;
        Ok(Self {
            store,
            scheme: config.scheme,
            header,
        })
    }
}

impl RequestInterceptor for AuthHeaderInterceptor {
    fn intercept(&self, mut request: reqwest::Request) -> Result<reqwest::Request, ClientError> {
        if let Some(token) = self.store.get_token() {
            let mut value = HeaderValue::from_str(&self.scheme.header_value(token.as_str()))
                .map_err(|_| {
                    ClientError::Configuration("token is not a valid header value".into())
                })?;
            value.set_sensitive(true);
            request.headers_mut().insert(self.header.clone(), value);
        }
        Ok(request)
    }
}
