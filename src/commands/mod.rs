//! Command handlers for the Yummy CLI
//!
//! - `header`       - Render the site header
//! - `dashboard`    - Mount the dashboard, optionally interactively
//! - `profile`      - One-shot profile update
//! - `session`      - Import tokens and show session status
//! - `logout`       - Clear the session
//! - `verify_email` - Email-verification landing page
//!
//! Every handler receives an [`AppContext`] built once from the loaded
//! configuration.

use std::sync::Arc;

use crate::api::{Backend, HttpBackend};
use crate::config::Config;
use crate::error::Result;
use crate::profile::ProfileStore;
use crate::session::SessionContext;

pub mod dashboard;
pub mod dashboard_commands;

/// Shared services for one CLI invocation
#[derive(Clone)]
pub struct AppContext {
    /// Validated configuration
    pub config: Config,
    /// Session storage selected by the configuration
    pub session: Arc<SessionContext>,
    /// Backend client
    pub backend: Arc<dyn Backend>,
    /// Profile cache shared by the header and the dashboard
    pub profiles: Arc<ProfileStore>,
}

impl AppContext {
    /// Build the context from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the session store or the HTTP client cannot be
    /// created.
    pub fn from_config(config: Config) -> Result<Self> {
        let session = Arc::new(SessionContext::from_config(&config.session)?);
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::from_config(&config.api)?);
        Ok(Self::new(config, session, backend))
    }

    /// Assemble a context from existing parts
    pub fn new(config: Config, session: Arc<SessionContext>, backend: Arc<dyn Backend>) -> Self {
        Self {
            config,
            session,
            backend,
            profiles: Arc::new(ProfileStore::new()),
        }
    }
}

// Header rendering
pub mod header {
    //! Header command handler

    use super::AppContext;
    use crate::error::Result;
    use crate::header::{AuthAffordance, Header, Section};
    use crate::navigation::Route;
    use crate::render::{render_header, render_navigation};

    /// Render the header for the current session
    ///
    /// # Arguments
    ///
    /// * `ctx` - Application context
    /// * `section` - Optional section to select, as if clicked on the landing page
    pub async fn run_header(ctx: &AppContext, section: Option<String>) -> Result<()> {
        let mut header = Header::new(
            ctx.session.clone(),
            ctx.backend.clone(),
            ctx.profiles.clone(),
            ctx.config.profile.default_image_sentinel.clone(),
        );

        let navigation = match section {
            Some(section) => {
                let section: Section = section.parse()?;
                Some(header.select_section(section, Route::Home.path()))
            }
            None => None,
        };

        if header.auth_affordance() == AuthAffordance::LogoutButton {
            header.refresh_indicator().await;
        }

        println!("{}", render_header(&header));
        if let Some(navigation) = navigation {
            println!("{}", render_navigation(&navigation));
        }
        Ok(())
    }
}

// One-shot profile editing
pub mod profile {
    //! Profile update command handler

    use std::path::PathBuf;

    use super::AppContext;
    use crate::avatar::StagedFile;
    use crate::dashboard::{Dashboard, Mount};
    use crate::error::{Result, YummyError};
    use crate::profile::ProfileField;
    use crate::render::{render_acknowledgment, render_navigation};

    /// Edits requested on the command line
    #[derive(Debug, Clone, Default)]
    pub struct ProfileEdits {
        /// New first name
        pub first_name: Option<String>,
        /// New last name
        pub last_name: Option<String>,
        /// New phone number
        pub phone: Option<String>,
        /// Image to upload
        pub image: Option<PathBuf>,
        /// Remove the avatar
        pub clear_image: bool,
    }

    /// Load the profile, apply the edits, and save
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be staged, or if the profile
    /// could not be loaded (saving a blank form would erase it).
    pub async fn update_profile(ctx: &AppContext, edits: ProfileEdits) -> Result<()> {
        let mount = Dashboard::mount(
            ctx.session.clone(),
            ctx.backend.clone(),
            ctx.profiles.clone(),
            &ctx.config.profile,
        )
        .await;

        let mut dashboard = match mount {
            Mount::Redirect(navigation) => {
                println!("{}", render_navigation(&navigation));
                return Ok(());
            }
            Mount::Mounted(dashboard) => dashboard,
        };

        let editor = dashboard.profile_mut();
        if editor.is_degraded() {
            return Err(YummyError::NotReady(
                "profile could not be loaded; refusing to overwrite it".to_string(),
            )
            .into());
        }

        let fields = [
            (ProfileField::FirstName, edits.first_name),
            (ProfileField::LastName, edits.last_name),
            (ProfileField::PhoneNumber, edits.phone),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                editor.edit_field(field, value);
            }
        }

        if let Some(path) = edits.image {
            editor.select_avatar(StagedFile::from_path(&path).await?);
        } else if edits.clear_image {
            editor.clear_avatar();
        }

        let ack = editor.save().await?;
        println!("{}", render_acknowledgment(&ack));
        Ok(())
    }
}

// Session management
pub mod session {
    //! Session command handlers

    use colored::Colorize;

    use super::AppContext;
    use crate::error::Result;
    use crate::session::{GuardOutcome, Session};

    /// Store tokens issued by the backend login endpoint
    pub fn import(ctx: &AppContext, access: String, refresh: Option<String>) -> Result<()> {
        let mut session = Session::new(access);
        if let Some(refresh) = refresh {
            session = session.with_refresh(refresh);
        }
        ctx.session.establish(&session)?;
        ctx.profiles.invalidate();
        println!("{}", "Session stored.".green());
        Ok(())
    }

    /// Print whether an access credential is stored
    pub fn status(ctx: &AppContext) -> Result<()> {
        match ctx.session.guard() {
            GuardOutcome::Authenticated(session) => {
                let refresh = if session.refresh.is_some() {
                    "with refresh token"
                } else {
                    "without refresh token"
                };
                println!("{} ({})", "Signed in".green(), refresh);
            }
            GuardOutcome::RedirectToLogin => {
                println!("{}", "Not signed in".yellow());
            }
        }
        Ok(())
    }
}

// Logout
pub mod logout {
    //! Logout command handler

    use colored::Colorize;

    use super::AppContext;
    use crate::error::Result;

    /// Clear every stored credential
    pub fn run_logout(ctx: &AppContext) -> Result<()> {
        ctx.session.logout()?;
        ctx.profiles.invalidate();
        println!("{}", "Logged out.".green());
        Ok(())
    }
}

// Email verification landing page
pub mod verify_email {
    //! Email-verification command handler

    use std::io::Write;
    use std::time::Duration;

    use super::AppContext;
    use crate::email_verified::{VerificationPage, VerificationStatus};
    use crate::error::Result;
    use crate::navigation::{Navigation, Route};
    use crate::render::{render_navigation, render_verification};

    /// Show the landing page and count down to the login redirect
    ///
    /// # Arguments
    ///
    /// * `ctx` - Application context
    /// * `status` - Raw `status` value
    /// * `query` - Raw query string, used when `status` is absent
    /// * `no_wait` - Redirect immediately instead of counting down
    pub async fn run_verify_email(
        ctx: &AppContext,
        status: Option<String>,
        query: Option<String>,
        no_wait: bool,
    ) -> Result<()> {
        let status = match (status, query) {
            (Some(status), _) => VerificationStatus::from_status(Some(&status)),
            (None, Some(query)) => VerificationStatus::from_query(&query),
            (None, None) => VerificationStatus::from_status(None),
        };

        let mut page = VerificationPage::new(
            status,
            ctx.config.verification.redirect_seconds,
            &ctx.session,
        )?;
        println!("{}", render_verification(&page));

        let navigation = if no_wait {
            Navigation::Redirect(Route::Login)
        } else {
            page.run(Duration::from_secs(1), |remaining| {
                print!("\r{} ", remaining);
                let _ = std::io::stdout().flush();
            })
            .await
        };

        println!("\n{}", render_navigation(&navigation));
        Ok(())
    }
}
