//! Single-flight permission loading
//!
//! Navigations that arrive while a fetch is pending wait on that fetch
//! instead of starting their own. The slot is emptied once the fetch
//! settles, so a failed fetch can be retried by the next navigation.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use warden_core::{FetchError, PermissionEntry, PermissionSource, SessionIdentity, Token};

type PermissionResult = Result<Arc<Vec<PermissionEntry>>, FetchError>;
type SharedFetch = Shared<BoxFuture<'static, PermissionResult>>;

pub struct PermissionLoader {
    source: Arc<dyn PermissionSource>,
    in_flight: Mutex<Option<SharedFetch>>,
}

impl PermissionLoader {
    pub fn new(source: Arc<dyn PermissionSource>) -> Self {
        Self {
            source,
            in_flight: Mutex::new(None),
        }
    }

    /// Fetch the permission tree, joining a fetch already in progress
    pub async fn load(&self, identity: SessionIdentity, token: Token) -> PermissionResult {
        let fetch = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(pending) = slot.as_ref() {
                debug!("Joining in-flight permission fetch");
                pending.clone()
            } else {
                let source = Arc::clone(&self.source);
                let fetch = async move {
                    source
                        .fetch_permissions(&identity, &token)
                        .await
                        .map(Arc::new)
                }
                .boxed()
                .shared();
                *slot = Some(fetch.clone());
                fetch
            }
        };

        let result = fetch.clone().await;

        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|pending| pending.ptr_eq(&fetch)) {
            *slot = None;
        }
        result
    }

    /// Whether a fetch is currently pending
    pub fn is_loading(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
