//! Request and response interception hooks
//!
//! Request interceptors run, in registration order, on every outgoing request
//! right before it is sent. Response interceptors observe every non-success
//! response before the call is rejected with the original payload.

pub mod request;
pub mod response;

use crate::client::error::{ClientError, ErrorPayload};

pub use request::AuthHeaderInterceptor;
pub use response::{AuthResponseInterceptor, ResponseAction, classify};

/// Hook applied to every outgoing request
pub trait RequestInterceptor: Send + Sync {
    /// Return the (possibly mutated) request, or an error to abort the call
    fn intercept(&self, request: reqwest::Request) -> Result<reqwest::Request, ClientError>;
}

/// Hook observing every response
pub trait ResponseInterceptor: Send + Sync {
    /// Called for 2xx responses, which are passed through unchanged
    fn on_success(&self, _status: u16) {}

    /// Called for any other status; the call is rejected with `payload` afterwards
    fn on_failure(&self, payload: &ErrorPayload);
}
