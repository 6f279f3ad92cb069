//! Warden HTTP client

pub mod error;
pub mod permissions;

use crate::interceptor::{
    AuthHeaderInterceptor, AuthResponseInterceptor, RequestInterceptor, ResponseInterceptor,
};
use error::{ClientError, ErrorPayload};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use warden_core::config::HttpConfig;
use warden_core::{Navigator, Notifier, TokenStore, WardenConfig};

pub use permissions::HttpPermissionSource;

/// Content type used by [`WardenClient::post_form`]
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// HTTP client with request/response interceptor chains
#[derive(Clone)]
pub struct WardenClient {
    client: Client,
    base_url: String,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl WardenClient {
    /// Create a new client without interceptors
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> WardenClientBuilder {
        WardenClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder for `path`; interceptors run when it is executed
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and decode the JSON body of a successful response
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = request.build()?;
        self.dispatch(request).await
    }

    /// Execute a request and return the successful response unchanged
    ///
    /// For endpoints whose body is not JSON.
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let request = request.build()?;
        self.send_request(request).await
    }

    /// `GET path?params`, resolving to the response body
    pub async fn get<T, Q>(&self, path: &str, params: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).query(params);
        self.execute(request).await
    }

    /// `POST path` with a url-encoded form body, resolving to the response body
    pub async fn post_form<T, F>(&self, path: &str, form: &F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let mut request = self.request(Method::POST, path).form(form).build()?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        self.dispatch(request).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: reqwest::Request) -> Result<T, ClientError> {
        let response = self.send_request(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_request(&self, request: reqwest::Request) -> Result<reqwest::Response, ClientError> {
        let request = self
            .request_interceptors
            .iter()
            .try_fold(request, |request, interceptor| interceptor.intercept(request))?;

        debug!(method = %request.method(), url = %request.url(), "Sending request");
        let response = self.client.execute(request).await?;
        let status = response.status().as_u16();

        if response.status().is_success() {
            for interceptor in &self.response_interceptors {
                interceptor.on_success(status);
            }
            return Ok(response);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                warn!(status, error = %err, "Failed to read error response body");
                status_line(status)
            }
        };
        let payload = ErrorPayload::from_text(status, text);
        for interceptor in &self.response_interceptors {
            interceptor.on_failure(&payload);
        }
        Err(ClientError::Rejected(payload))
    }
}

/// Builder for WardenClient
#[derive(Default)]
pub struct WardenClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl WardenClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Take base URL and timeout from configuration
    #[must_use]
    pub fn http_config(self, config: &HttpConfig) -> Self {
        self.base_url(config.base_url.clone()).timeout(config.timeout())
    }

    /// Append a request interceptor
    #[must_use]
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    /// Append a response interceptor
    #[must_use]
    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

    /// Install the token header and status handling interceptors
    ///
    /// # Errors
    ///
    /// Returns an error if the configured auth header name is invalid
    pub fn with_auth(
        self,
        store: &Arc<TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        config: &WardenConfig,
    ) -> Result<Self, ClientError> {
        let request = AuthHeaderInterceptor::new(Arc::clone(store), &config.auth)?;
        let response = AuthResponseInterceptor::new(
            Arc::clone(store),
            navigator,
            notifier,
            config.routing.clone(),
            config.notify.clone(),
        );
        Ok(self
            .request_interceptor(Arc::new(request))
            .response_interceptor(Arc::new(response)))
    }

    /// Build the client
    ///
    /// An empty base URL resolves to the page origin in the browser.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL is set outside the browser, or if the
    /// underlying reqwest client cannot be built
    pub fn build(self) -> Result<WardenClient, ClientError> {
        let base_url = match self.base_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => url,
            None => page_origin()?,
        };

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        #[cfg_attr(target_arch = "wasm32", allow(unused_mut))]
        let mut client_builder = ClientBuilder::new();

        // The browser owns the user agent and request timeouts
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(timeout) = self.timeout {
                client_builder = client_builder.timeout(timeout);
            }
            client_builder = client_builder.user_agent(
                self.user_agent.unwrap_or_else(|| {
                    concat!("warden-client/", env!("CARGO_PKG_VERSION")).to_string()
                }),
            );
        }

        let client = client_builder.build()?;

        Ok(WardenClient {
            client,
            base_url,
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
        })
    }
}

fn status_line(status: u16) -> String {
    reqwest::StatusCode::from_u16(status).map_or_else(|_| status.to_string(), |code| code.to_string())
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Result<String, ClientError> {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .filter(|origin| !origin.is_empty())
        .ok_or_else(|| ClientError::Configuration("http.base_url is empty and the page origin is unavailable".into()))
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Result<String, ClientError> {
    Err(ClientError::Configuration(
        "http.base_url is required outside the browser".into(),
    ))
}
