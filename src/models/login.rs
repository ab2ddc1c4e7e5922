use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The login mode of a browser session.
///
/// - `Waiting`: Nothing in flight; the resolver may try the next login path
/// - `LoggingIn`: A remote login or settings lookup is in flight
/// - `Ready`: Logged in and the user-data subscription is ready
/// - `Error`: The login was rejected or failed
/// - `StudentList`: The session has a student list to pick from
/// - `NoStudentList`: The session exists without a student list, or lookup failed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    Waiting,
    LoggingIn,
    Ready,
    Error,
    StudentList,
    NoStudentList,
}

impl LoginMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::LoggingIn => "loggingin",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::StudentList => "studentlist",
            Self::NoStudentList => "nostudentlist",
        }
    }
}

/// Settings of a teaching session, as returned by the settings lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionSettings(pub Value);

impl SessionSettings {
    /// Sentinel returned by the lookup when the session has no student list.
    pub const NONE_SENTINEL: i64 = -1;

    /// Interpret a raw lookup result; the `-1` sentinel yields `None`.
    pub fn from_lookup(raw: Value) -> Option<Self> {
        if raw.as_i64() == Some(Self::NONE_SENTINEL) {
            None
        } else {
            Some(Self(raw))
        }
    }
}

/// Transient login state owned by the login resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginState {
    pub mode: LoginMode,
    #[serde(default)]
    pub settings: Option<SessionSettings>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            mode: LoginMode::Waiting,
            settings: None,
        }
    }
}

/// Login hints injected into the page at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectedLogin {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Bootstrap payload embedded at page-render time.
///
/// Each key can be taken once; later reads see nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectedData {
    #[serde(default)]
    pub login: Option<InjectedLogin>,
    /// Payload for the API-embed render mode.
    #[serde(default)]
    pub api: Option<Value>,
}

impl InjectedData {
    pub fn take_login(&mut self) -> Option<InjectedLogin> {
        self.login.take()
    }

    pub fn take_api(&mut self) -> Option<Value> {
        self.api.take()
    }
}

/// Credentials handed back by a successful username login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub id: String,
    pub token: String,
    pub token_expires: Option<String>,
}

/// Result of a username login call.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Accepted(Credentials),
    /// The server answered `NOTVALID`.
    NotValid,
}

/// Arguments of a username login call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameLogin {
    pub username: String,
    pub token: Option<String>,
    pub is_student_list: bool,
    pub slug: Option<String>,
}
