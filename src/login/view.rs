use serde::Serialize;

use crate::models::SessionSettings;

/// Authenticated routes, first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// `/teacher/projector/:slug`
    Projector { slug: String },
    /// `/teacher/...`
    Teacher,
    /// `/:slug`
    Student { slug: String },
    NotFound,
}

impl Route {
    pub fn resolve(pathname: &str) -> Self {
        let segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["teacher", "projector", slug, ..] => Self::Projector {
                slug: slug.to_string(),
            },
            ["teacher", ..] => Self::Teacher,
            [slug, ..] => Self::Student {
                slug: slug.to_string(),
            },
            [] => Self::NotFound,
        }
    }
}

/// What the router shows for the current login state.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterView {
    /// Strip the login hints from the address bar.
    Redirect(String),
    Spinner,
    Routes(Route),
    LoginError,
    StudentLogin {
        settings: SessionSettings,
        slug: Option<String>,
    },
    NotLoggedIn,
}
