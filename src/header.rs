//! Site header
//!
//! Section navigation, the login/logout affordance, and the small profile
//! indicator shown to signed-in users. The header never caches the
//! authentication state: every call to [`Header::auth_affordance`] reads
//! the session again.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::api::Backend;
use crate::error::{Result, YummyError};
use tokio::sync::watch;

use crate::navigation::{Navigation, Route};
use crate::profile::{Profile, ProfileStore};
use crate::session::SessionContext;

/// Anchored sections of the landing page, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Top banner
    #[default]
    Hero,
    /// About the restaurant
    About,
    /// Menu
    Menu,
    /// Events
    Events,
    /// Chefs
    Chefs,
    /// Gallery
    Gallery,
    /// Contact form
    Contact,
}

impl Section {
    /// Anchor id on the landing page.
    pub fn id(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Menu => "menu",
            Section::Events => "events",
            Section::Chefs => "chefs",
            Section::Gallery => "gallery",
            Section::Contact => "contact",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Hero => "Home",
            Section::About => "About",
            Section::Menu => "Menu",
            Section::Events => "Events",
            Section::Chefs => "Chefs",
            Section::Gallery => "Gallery",
            Section::Contact => "Contact",
        }
    }

    /// All sections in menu order.
    pub fn all() -> [Section; 7] {
        [
            Section::Hero,
            Section::About,
            Section::Menu,
            Section::Events,
            Section::Chefs,
            Section::Gallery,
            Section::Contact,
        ]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = YummyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('#').to_lowercase();
        Section::all()
            .into_iter()
            .find(|section| section.id() == wanted)
            .ok_or_else(|| YummyError::Config(format!("Unknown section: {}", s)))
    }
}

/// Right-hand side of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAffordance {
    /// Visitor: link to the login view
    LoginLink,
    /// Signed in: logout button and profile indicator
    LogoutButton,
}

/// Avatar and email shown next to the logout button
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileIndicator {
    /// Avatar URL; `None` shows the empty-avatar icon
    pub avatar: Option<String>,
    /// Login email, when the account endpoint answered
    pub email: Option<String>,
}

/// Header state for one page view.
pub struct Header {
    session: Arc<SessionContext>,
    backend: Arc<dyn Backend>,
    store: Arc<ProfileStore>,
    updates: watch::Receiver<Option<Profile>>,
    sentinel: String,
    active: Section,
    menu_open: bool,
    indicator: ProfileIndicator,
}

impl Header {
    /// Creates a header with the hero section active and the menu closed.
    pub fn new(
        session: Arc<SessionContext>,
        backend: Arc<dyn Backend>,
        store: Arc<ProfileStore>,
        sentinel: impl Into<String>,
    ) -> Self {
        let updates = store.subscribe();
        Self {
            session,
            backend,
            store,
            updates,
            sentinel: sentinel.into(),
            active: Section::Hero,
            menu_open: false,
            indicator: ProfileIndicator::default(),
        }
    }

    /// Login link or logout button, from the session as it is now.
    pub fn auth_affordance(&self) -> AuthAffordance {
        if self.session.is_authenticated() {
            AuthAffordance::LogoutButton
        } else {
            AuthAffordance::LoginLink
        }
    }

    /// Highlighted section.
    pub fn active(&self) -> Section {
        self.active
    }

    /// Whether the mobile menu is expanded.
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Last indicator computed by [`refresh_indicator`](Self::refresh_indicator).
    pub fn indicator(&self) -> &ProfileIndicator {
        &self.indicator
    }

    /// Opens or closes the mobile menu.
    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Activates a section and closes the menu.
    ///
    /// # Arguments
    ///
    /// * `section` - Section the user picked
    /// * `current_path` - Path of the view the header is shown on
    ///
    /// # Returns
    ///
    /// A scroll on the landing page, otherwise a move to the landing page
    /// followed by a scroll.
    pub fn select_section(&mut self, section: Section, current_path: &str) -> Navigation {
        self.active = section;
        self.menu_open = false;
        if current_path == Route::Home.path() {
            Navigation::Scroll(section.id().to_string())
        } else {
            Navigation::RedirectThenScroll(Route::Home, section.id().to_string())
        }
    }

    /// Recomputes the profile indicator.
    ///
    /// The avatar comes from the shared profile store (fetched through it
    /// when empty), the email from the account endpoint. Both requests run
    /// concurrently and either may fail independently.
    pub async fn refresh_indicator(&mut self) -> &ProfileIndicator {
        let access = match self.session.current() {
            Ok(Some(session)) => session.access,
            Ok(None) => {
                self.indicator = ProfileIndicator::default();
                return &self.indicator;
            }
            Err(e) => {
                tracing::warn!("Header could not read session: {:#}", e);
                self.indicator = ProfileIndicator::default();
                return &self.indicator;
            }
        };

        let (profile, account) = tokio::join!(
            self.store
                .get_or_fetch(self.backend.as_ref(), &access, &self.sentinel),
            self.backend.fetch_account(&access)
        );

        let avatar = match profile {
            Ok(profile) => profile.image,
            Err(e) => {
                tracing::warn!("Header profile fetch failed: {:#}", e);
                None
            }
        };
        let email = match account {
            Ok(account) if !account.email.is_empty() => Some(account.email),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Header account fetch failed: {:#}", e);
                None
            }
        };

        self.indicator = ProfileIndicator { avatar, email };
        &self.indicator
    }

    /// Applies profile changes published to the shared store since the
    /// last call, such as a dashboard save.
    ///
    /// Only the avatar follows the store; the email is left as is. An
    /// invalidated store shows the empty avatar.
    ///
    /// # Returns
    ///
    /// `true` when the indicator changed.
    pub fn follow_store(&mut self) -> bool {
        if !self.updates.has_changed().unwrap_or(false) {
            return false;
        }
        let avatar = self
            .updates
            .borrow_and_update()
            .as_ref()
            .and_then(|profile| profile.image.clone());
        if avatar == self.indicator.avatar {
            return false;
        }
        self.indicator.avatar = avatar;
        true
    }

    /// Signs the user out from the header and asks for a reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be cleared.
    pub fn logout(&mut self) -> Result<Navigation> {
        self.session.logout()?;
        self.store.invalidate();
        self.indicator = ProfileIndicator::default();
        Ok(Navigation::Reload)
    }
}
