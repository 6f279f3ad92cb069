//! Deferred callbacks on whichever executor the client runs on

use std::time::Duration;

/// Run `action` once `delay` has elapsed
///
/// Outside a Tokio runtime the action runs immediately.
#[cfg(not(target_arch = "wasm32"))]
pub fn after<F>(delay: Duration, action: F)
where
    F: FnOnce() + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                action();
            });
        }
        Err(_) => {
            tracing::warn!("No async runtime, running deferred action immediately");
            action();
        }
    }
}

/// Run `action` once `delay` has elapsed
#[cfg(target_arch = "wasm32")]
pub fn after<F>(delay: Duration, action: F)
where
    F: FnOnce() + Send + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::sleep(delay).await;
        action();
    });
}
