//! Warden HTTP client
//!
//! A reqwest-based client whose requests pass through interceptor chains:
//! the token is attached on the way out, and 401/403/404/other failures are
//! turned into logouts, login redirects and notifications on the way back.

pub mod client;
pub mod interceptor;
pub mod schedule;

pub use client::error::{ClientError, ErrorPayload};
pub use client::{HttpPermissionSource, WardenClient, WardenClientBuilder};
pub use interceptor::{
    AuthHeaderInterceptor, AuthResponseInterceptor, RequestInterceptor, ResponseAction,
    ResponseInterceptor,
};
