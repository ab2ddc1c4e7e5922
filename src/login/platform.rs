//! Collaborators the host platform provides to the login resolver.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Credentials, LoginOutcome, UsernameLogin};

/// Errors reported by platform procedures.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Remote call failed: {0}")]
    Remote(String),

    #[error("Login token rejected")]
    TokenRejected,

    #[error("Subscription failed: {0}")]
    Subscription(String),
}

/// A live data subscription. Stopping it releases the server-side publication.
pub trait Subscription: Send {
    fn stop(&mut self);
}

/// Remote procedures and account primitives of the hosting platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Id of the logged-in user, if any.
    fn current_user(&self) -> Option<String>;

    async fn username_login(&self, request: UsernameLogin) -> Result<LoginOutcome, PlatformError>;

    async fn login_with_token(&self, token: &str) -> Result<(), PlatformError>;

    /// Mark the client as logged in with freshly issued credentials.
    fn make_logged_in(&self, credentials: &Credentials);

    /// Raw settings of the session at `slug`; `-1` when it has no student list.
    async fn session_settings(&self, slug: &str) -> Result<Value, PlatformError>;

    /// Subscribe to the user-data feed. Resolves once the subscription is ready.
    async fn subscribe_user_data(&self) -> Result<Box<dyn Subscription>, PlatformError>;
}

/// Client-side storage for the login token.
pub trait TokenStore: Send + Sync {
    fn stored(&self) -> Option<String>;
    fn store(&self, credentials: &Credentials);
    fn unstore(&self);
}
