//! Routes and navigation intents
//!
//! Components never navigate themselves. They return a [`Navigation`]
//! value and the front end decides how to carry it out.

use std::fmt;

/// Views the client knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public landing page
    Home,
    /// Login view
    Login,
    /// Authenticated user dashboard
    Dashboard,
    /// Email-verification landing page
    EmailVerified,
}

impl Route {
    /// Path of the route on the public site
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::EmailVerified => "/email-verified",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What the caller should do after a component operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Move to another view
    Redirect(Route),
    /// Reload the current view from scratch
    Reload,
    /// Stay on the current view and scroll to an anchor
    Scroll(String),
    /// Move to another view, then scroll to an anchor on it
    RedirectThenScroll(Route, String),
}
