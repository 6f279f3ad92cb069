//! Recording collaborators shared by the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use warden_core::{Location, Navigator, Notification, Notifier, TokenStore, WardenConfig};
use warden_http::WardenClient;

pub struct RecordingNavigator {
    current: Mutex<String>,
    replaced: Mutex<Vec<Location>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(path.to_string()),
            replaced: Mutex::new(Vec::new()),
        })
    }

    pub fn replaced(&self) -> Vec<Location> {
        self.replaced.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn replace(&self, location: Location) {
        *self.current.lock().unwrap() = location.full_path();
        self.replaced.lock().unwrap().push(location);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.shown.lock().unwrap().push(notification);
    }
}

pub struct Harness {
    pub client: WardenClient,
    pub store: Arc<TokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(base_url: &str, current_path: &str, mut config: WardenConfig) -> Harness {
    config.http.base_url = base_url.to_string();
    let store = Arc::new(TokenStore::in_memory());
    let navigator = RecordingNavigator::at(current_path);
    let notifier = Arc::new(RecordingNotifier::default());

    let client = WardenClient::builder()
        .http_config(&config.http)
        .with_auth(&store, navigator.clone(), notifier.clone(), &config)
        .unwrap()
        .build()
        .unwrap();

    Harness {
        client,
        store,
        navigator,
        notifier,
    }
}
