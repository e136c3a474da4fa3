//! Email-verification landing page
//!
//! The backend redirects here after the user clicks the link in the
//! verification mail, with `?status=success` or some other status. The
//! page shows the outcome, counts down, then sends the user to login.
//! A failed verification also destroys the locally held session.

use std::time::Duration;

use crate::error::Result;
use crate::navigation::{Navigation, Route};
use crate::session::SessionContext;

/// Outcome reported by the backend redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Address confirmed
    Success,
    /// Token invalid, expired, or status missing
    Failure,
}

impl VerificationStatus {
    /// Interprets a raw `status` value. Only `success` is a success.
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("success") => VerificationStatus::Success,
            _ => VerificationStatus::Failure,
        }
    }

    /// Reads `status` from a query string, with or without the leading `?`.
    ///
    /// # Examples
    ///
    /// ```
    /// use yummy::email_verified::VerificationStatus;
    ///
    /// assert_eq!(VerificationStatus::from_query("?status=success"), VerificationStatus::Success);
    /// assert_eq!(VerificationStatus::from_query("status=expired"), VerificationStatus::Failure);
    /// assert_eq!(VerificationStatus::from_query(""), VerificationStatus::Failure);
    /// ```
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let status = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "status")
            .map(|(_, value)| value.into_owned());
        Self::from_status(status.as_deref())
    }
}

/// Landing page state
#[derive(Debug, Clone)]
pub struct VerificationPage {
    status: VerificationStatus,
    remaining: u32,
}

impl VerificationPage {
    /// Opens the page.
    ///
    /// On [`VerificationStatus::Failure`] the session is cleared before
    /// the page is shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be cleared.
    pub fn new(status: VerificationStatus, seconds: u32, session: &SessionContext) -> Result<Self> {
        if status == VerificationStatus::Failure {
            tracing::info!("Email verification failed, clearing session");
            session.logout()?;
        }
        Ok(Self {
            status,
            remaining: seconds,
        })
    }

    /// Outcome shown on the page.
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    /// Page heading.
    pub fn title(&self) -> &'static str {
        match self.status {
            VerificationStatus::Success => "Email Verified Successfully!",
            VerificationStatus::Failure => "Email Verification Failed",
        }
    }

    /// Explanatory text.
    pub fn message(&self) -> &'static str {
        match self.status {
            VerificationStatus::Success => "Your email has been verified. You can now log in.",
            VerificationStatus::Failure => {
                "The verification link is invalid or has expired. Please register or request a new link."
            }
        }
    }

    /// Seconds left before the redirect.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advances the countdown by one second.
    ///
    /// Returns the redirect once the countdown reaches zero, and on every
    /// call after that.
    pub fn tick(&mut self) -> Option<Navigation> {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Some(Navigation::Redirect(Route::Login))
        } else {
            None
        }
    }

    /// Runs the countdown to completion.
    ///
    /// `on_tick` is called with the remaining seconds after each tick. A
    /// countdown of zero redirects immediately.
    pub async fn run<F>(&mut self, period: Duration, mut on_tick: F) -> Navigation
    where
        F: FnMut(u32),
    {
        if self.remaining == 0 {
            return Navigation::Redirect(Route::Login);
        }

        let mut interval = tokio::time::interval(period);
        // First tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let next = self.tick();
            on_tick(self.remaining);
            if let Some(navigation) = next {
                tracing::debug!("Verification countdown finished");
                return navigation;
            }
        }
    }
}
