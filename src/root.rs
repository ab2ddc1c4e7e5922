//! Top-level render mode: API embed, routed application, and the
//! disconnected overlay.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::InjectedData;

/// What the root renders.
#[derive(Debug, Clone, PartialEq)]
pub enum RootView {
    /// Injected data not read yet.
    Blank,
    /// Embedded single-activity view driven by the `api` payload.
    Api { data: Value, disconnected: bool },
    /// The routed application; see [`crate::login::LoginResolver`].
    App { disconnected: bool },
}

#[derive(Debug, Clone, PartialEq)]
enum RootMode {
    Waiting,
    Api(Value),
    App,
}

pub struct Root {
    mode: RootMode,
    connected: watch::Receiver<bool>,
}

impl Root {
    /// `connected` is usually the output of [`ConnectionMonitor::spawn`].
    pub fn new(connected: watch::Receiver<bool>) -> Self {
        Self {
            mode: RootMode::Waiting,
            connected,
        }
    }

    /// Consume the `api` key of the injected data and pick the render mode.
    pub fn mount(&mut self, injected: &Mutex<InjectedData>) {
        let api = injected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take_api();
        self.mode = match api {
            Some(data) => {
                tracing::info!("Rendering API embed view");
                RootMode::Api(data)
            }
            None => RootMode::App,
        };
    }

    pub fn view(&self) -> RootView {
        let disconnected = !*self.connected.borrow();
        match &self.mode {
            RootMode::Waiting => RootView::Blank,
            RootMode::Api(data) => RootView::Api {
                data: data.clone(),
                disconnected,
            },
            RootMode::App => RootView::App { disconnected },
        }
    }
}

/// Mirrors the platform's connection status once a grace period has passed.
pub struct ConnectionMonitor;

impl ConnectionMonitor {
    /// Startup window during which the client counts as connected.
    pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

    pub fn spawn(
        mut status: watch::Receiver<bool>,
        grace: Duration,
    ) -> (watch::Receiver<bool>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(true);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            loop {
                let connected = *status.borrow_and_update();
                if !connected {
                    tracing::warn!("Disconnected, waiting for reconnection");
                }
                if tx.send(connected).is_err() {
                    break;
                }
                if status.changed().await.is_err() {
                    break;
                }
            }
        });
        (rx, handle)
    }
}
