//! Status-code handling: forced logout, session expiry and notifications

use super::ResponseInterceptor;
use crate::client::error::ErrorPayload;
use crate::schedule;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use warden_core::config::{NotifyConfig, RoutingConfig};
use warden_core::{Location, Navigator, Notification, Notifier, TokenStore};

/// What to do with a response of a given status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    /// 2xx: hand the response to the caller unchanged
    Pass,
    /// 401: log out and send the user to the login page
    ForceLogin,
    /// 403: tell the user the session expired, log out, redirect after a grace period
    SessionExpired,
    /// 404: tell the user the resource does not exist
    NotFound,
    /// Anything else: show the server's message
    Notify,
}

pub const fn classify(status: u16) -> ResponseAction {
    match status {
        200..=299 => ResponseAction::Pass,
        401 => ResponseAction::ForceLogin,
        403 => ResponseAction::SessionExpired,
        404 => ResponseAction::NotFound,
        _ => ResponseAction::Notify,
    }
}

/// Reacts to failed responses on behalf of the whole application
pub struct AuthResponseInterceptor {
    store: Arc<TokenStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    routing: RoutingConfig,
    notify: NotifyConfig,
}

impl AuthResponseInterceptor {
    pub fn new(
        store: Arc<TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        routing: RoutingConfig,
        notify: NotifyConfig,
    ) -> Self {
        Self {
            store,
            navigator,
            notifier,
            routing,
            notify,
        }
    }

    /// Login page with the current page as the return target
    fn login_location(&self) -> Location {
        let current = self.navigator.current_path();
        let location = Location::parse(&current);
        if location.path == self.routing.login_path {
            return location;
        }
        Location::login(&self.routing.login_path, &self.routing.redirect_param, &current)
    }

    fn show(&self, message: &str, duration_ms: u64) {
        self.notifier.notify(Notification::new(
            message,
            Duration::from_millis(duration_ms),
        ));
    }
}

impl ResponseInterceptor for AuthResponseInterceptor {
    fn on_failure(&self, payload: &ErrorPayload) {
        let action = classify(payload.status);
        warn!(status = payload.status, ?action, "Request rejected");

        match action {
            ResponseAction::Pass => {}
            ResponseAction::ForceLogin => {
                self.store.clear();
                let location = self.login_location();
                info!(%location, "Unauthorized, redirecting to login");
                self.navigator.replace(location);
            }
            ResponseAction::SessionExpired => {
                self.show(&self.notify.session_expired, self.notify.forbidden_duration_ms);
                self.store.clear();
                // Captured now: the page may change before the grace period ends
                let location = self.login_location();
                let navigator = Arc::clone(&self.navigator);
                schedule::after(self.notify.forbidden_redirect_delay(), move || {
                    info!(%location, "Session expired, redirecting to login");
                    navigator.replace(location);
                });
            }
            ResponseAction::NotFound => {
                self.show(&self.notify.not_found, self.notify.default_duration_ms);
            }
            ResponseAction::Notify => {
                let fallback = format!("Request failed with status {}", payload.status);
                let message = payload.message().unwrap_or(&fallback);
                self.show(message, self.notify.default_duration_ms);
            }
        }
    }
}
