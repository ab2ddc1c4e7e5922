//! Login resolution for a browser session.
//!
//! The [`LoginResolver`] decides how a visitor gets logged in, trying in order:
//! injected login data, the `login` query parameter, the stored login token,
//! and finally the session settings of the route slug. The first applicable
//! path wins; nothing else is tried until the resolver is back in
//! [`LoginMode::Waiting`].
//!
//! State changes are published on a watch channel. Hosts drive the resolver
//! either by calling its methods directly or by spawning [`LoginResolver::run`]
//! and talking to it through a [`ResolverHandle`].

mod platform;
mod query;
mod view;

pub use platform::{Platform, PlatformError, Subscription, TokenStore};
pub use query::LoginQuery;
pub use view::{Route, RouterView};

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};

use crate::models::*;

/// Current address of the browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Query string, including its leading `?` when non-empty.
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }

    /// First path segment, which names the session.
    pub fn slug(&self) -> Option<String> {
        self.pathname
            .split('/')
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Everything the resolver needs from its surroundings.
#[derive(Clone)]
pub struct ResolverContext {
    pub platform: Arc<dyn Platform>,
    pub tokens: Arc<dyn TokenStore>,
    pub injected: Arc<Mutex<InjectedData>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolverCommand {
    NotReady,
    Navigate(Location),
    Unmount,
}

/// Handle for talking to a running resolver.
#[derive(Debug, Clone)]
pub struct ResolverHandle {
    commands: mpsc::UnboundedSender<ResolverCommand>,
    state: watch::Receiver<LoginState>,
}

impl ResolverHandle {
    /// Drop back to `Waiting` and re-run login resolution.
    pub fn not_ready(&self) {
        self.send(ResolverCommand::NotReady);
    }

    pub fn navigate(&self, location: Location) {
        self.send(ResolverCommand::Navigate(location));
    }

    /// Stop the resolver and its user-data subscription.
    pub fn unmount(&self) {
        self.send(ResolverCommand::Unmount);
    }

    pub fn state(&self) -> watch::Receiver<LoginState> {
        self.state.clone()
    }

    fn send(&self, command: ResolverCommand) {
        if self.commands.send(command).is_err() {
            tracing::debug!("Login resolver already stopped");
        }
    }
}

/// The login state machine of one browser session.
pub struct LoginResolver {
    ctx: ResolverContext,
    location: Location,
    state: watch::Sender<LoginState>,
    subscription: Option<Box<dyn Subscription>>,
    navigation: Option<String>,
    /// Created by the first [`LoginResolver::handle`]; closes once every handle is gone.
    commands_tx: Option<mpsc::WeakUnboundedSender<ResolverCommand>>,
    commands_rx: Option<mpsc::UnboundedReceiver<ResolverCommand>>,
}

impl LoginResolver {
    pub fn new(ctx: ResolverContext, location: Location) -> Self {
        let (state, _) = watch::channel(LoginState::default());
        Self {
            ctx,
            location,
            state,
            subscription: None,
            navigation: None,
            commands_tx: None,
            commands_rx: None,
        }
    }

    pub fn handle(&mut self) -> ResolverHandle {
        let commands = match self.commands_tx.as_ref().and_then(|weak| weak.upgrade()) {
            Some(tx) => tx,
            None => {
                let (tx, rx) = mpsc::unbounded_channel();
                self.commands_tx = Some(tx.downgrade());
                self.commands_rx = Some(rx);
                tx
            }
        };
        ResolverHandle {
            commands,
            state: self.state.subscribe(),
        }
    }

    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    pub fn mode(&self) -> LoginMode {
        self.state.borrow().mode
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Path the host should navigate to, if a login asked for one.
    pub fn take_navigation(&mut self) -> Option<String> {
        self.navigation.take()
    }

    /// Resume an existing login, then run login resolution once.
    ///
    /// The user-data subscription of an existing login is awaited before the
    /// login chain runs, so a resumed session never tries its stored token.
    pub async fn mount(&mut self) {
        if self.ctx.platform.current_user().is_some() {
            self.await_user_data().await;
        }
        self.update().await;
    }

    /// React to a new address. Only re-resolves while `Waiting` and when the
    /// query string actually changed.
    pub async fn location_changed(&mut self, location: Location) {
        let previous = std::mem::replace(&mut self.location, location);
        if self.mode() == LoginMode::Waiting && previous.search != self.location.search {
            self.update().await;
        }
    }

    pub async fn not_ready(&mut self) {
        self.set_mode(LoginMode::Waiting);
        self.update().await;
    }

    /// Process commands from [`ResolverHandle`]s until one unmounts or all
    /// of them are dropped. The resolver, and with it the user-data
    /// subscription, is released when this returns or is cancelled.
    pub async fn run(mut self) {
        let Some(mut commands) = self.commands_rx.take() else {
            return;
        };
        while let Some(command) = commands.recv().await {
            match command {
                ResolverCommand::NotReady => self.not_ready().await,
                ResolverCommand::Navigate(location) => self.location_changed(location).await,
                ResolverCommand::Unmount => break,
            }
        }
    }

    /// Stop the user-data subscription and release the resolver.
    pub fn unmount(self) {
        drop(self);
    }

    /// Try the first applicable login path.
    pub async fn update(&mut self) {
        let injected = self
            .ctx
            .injected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take_login();
        if let Some(InjectedLogin {
            token: Some(token),
            slug,
        }) = injected
        {
            self.token_login(&token, slug).await;
            return;
        }

        if self.mode() == LoginMode::LoggingIn {
            return;
        }

        let query = LoginQuery::parse(&self.location.search);
        if let Some(username) = query.login {
            self.login(&username, query.token, false).await;
            return;
        }

        if self.mode() == LoginMode::Ready {
            return;
        }

        if let Some(token) = self.ctx.tokens.stored() {
            self.token_login(&token, None).await;
        } else if let Some(slug) = self.location.slug() {
            self.lookup_settings(&slug).await;
        }
    }

    /// Log in by username, as the login forms do.
    pub async fn login(&mut self, username: &str, token: Option<String>, is_student_list: bool) {
        self.set_mode(LoginMode::LoggingIn);
        let request = UsernameLogin {
            username: username.to_string(),
            token,
            is_student_list,
            slug: self.location.slug(),
        };

        match self.ctx.platform.username_login(request).await {
            Ok(LoginOutcome::Accepted(credentials)) => {
                tracing::info!("Logged in as {}", username);
                self.ctx.platform.make_logged_in(&credentials);
                self.ctx.tokens.store(&credentials);
                self.await_user_data().await;
            }
            Ok(LoginOutcome::NotValid) => {
                tracing::warn!("Login for {} rejected", username);
                self.set_mode(LoginMode::Error);
            }
            Err(e) => {
                tracing::warn!("Login for {} failed: {}", username, e);
                self.set_mode(LoginMode::Error);
            }
        }
    }

    async fn token_login(&mut self, token: &str, slug: Option<String>) {
        self.set_mode(LoginMode::LoggingIn);
        if let Err(e) = self.ctx.platform.login_with_token(token).await {
            tracing::info!("Stored login token no longer valid: {}", e);
            self.ctx.tokens.unstore();
            self.set_mode(LoginMode::Waiting);
            return;
        }

        if let Some(slug) = slug {
            let path = format!("/{}", slug);
            self.location = Location::new(path.clone(), "");
            self.navigation = Some(path);
        }
        self.await_user_data().await;
    }

    async fn lookup_settings(&mut self, slug: &str) {
        self.set_mode(LoginMode::LoggingIn);
        let settings = match self.ctx.platform.session_settings(slug).await {
            Ok(raw) => SessionSettings::from_lookup(raw),
            Err(e) => {
                tracing::warn!("Settings lookup for {} failed: {}", slug, e);
                None
            }
        };

        self.state.send_modify(|state| match settings {
            Some(settings) => {
                state.settings = Some(settings);
                state.mode = LoginMode::StudentList;
            }
            None => state.mode = LoginMode::NoStudentList,
        });
    }

    async fn await_user_data(&mut self) {
        match self.ctx.platform.subscribe_user_data().await {
            Ok(subscription) => {
                if let Some(mut old) = self.subscription.replace(subscription) {
                    old.stop();
                }
                self.set_mode(LoginMode::Ready);
            }
            Err(e) => {
                tracing::error!("User data subscription failed: {}", e);
                self.set_mode(LoginMode::Error);
            }
        }
    }

    fn set_mode(&self, mode: LoginMode) {
        tracing::debug!("Login mode -> {}", mode.as_str());
        self.state.send_modify(|state| state.mode = mode);
    }

    /// What the router should show right now.
    pub fn view(&self) -> RouterView {
        let query = LoginQuery::parse(&self.location.search);
        if query.login.is_some() {
            return RouterView::Redirect(self.location.pathname.clone());
        }

        let state = self.state.borrow();
        match (state.mode, &state.settings) {
            (LoginMode::LoggingIn, _) => RouterView::Spinner,
            (LoginMode::Ready, _) if self.ctx.platform.current_user().is_some() => {
                RouterView::Routes(Route::resolve(&self.location.pathname))
            }
            (LoginMode::Error, _) => RouterView::LoginError,
            (LoginMode::StudentList, Some(settings)) => RouterView::StudentLogin {
                settings: settings.clone(),
                slug: self.location.slug(),
            },
            _ => RouterView::NotLoggedIn,
        }
    }
}

impl Drop for LoginResolver {
    fn drop(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            tracing::debug!("Stopping user data subscription");
            subscription.stop();
        }
    }
}
