//! Browser navigator backed by `window.history`

use tracing::warn;
use wasm_bindgen::JsValue;
use warden_core::{Location, Navigator};

/// Rewrites the address bar with `history.replaceState` and emits `popstate`
/// so the application router picks up the change
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        web_sys::window()
            .map(|window| {
                let location = window.location();
                format!(
                    "{}{}",
                    location.pathname().unwrap_or_default(),
                    location.search().unwrap_or_default()
                )
            })
            .unwrap_or_else(|| "/".to_string())
    }

    fn replace(&self, location: Location) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let url = location.full_path();

        let replaced = window.history().and_then(|history| {
            history.replace_state_with_url(&JsValue::NULL, "", Some(&url))
        });
        if let Err(err) = replaced {
            warn!(url = %url, error = ?err, "history.replaceState failed");
            return;
        }

        match web_sys::Event::new("popstate") {
            Ok(event) => {
                let _ = window.dispatch_event(&event);
            }
            Err(err) => warn!(error = ?err, "Could not create popstate event"),
        }
    }
}
