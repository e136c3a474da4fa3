//! Yummy - restaurant dashboard client library
//!
//! This library provides the client side of the Yummy restaurant site:
//! the session guard, the profile editor, the reservation list, the site
//! header, and the email-verification landing page, all talking to the
//! Yummy backend over HTTP.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Session context, guard, and credential stores
//! - `api`: Backend trait, HTTP implementation, and wire types
//! - `profile`: Profile types, shared profile store, and the editing state machine
//! - `avatar`: Avatar references, staged uploads, and preview handles
//! - `reservations`: Reservation list loader
//! - `dashboard`: Guarded composition of profile and reservations
//! - `header`: Section navigation and auth affordance
//! - `email_verified`: Verification landing page and countdown
//! - `navigation`: Routes and navigation intents
//! - `render`: Terminal rendering of the views
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use yummy::api::HttpBackend;
//! use yummy::dashboard::{Dashboard, Mount};
//! use yummy::profile::ProfileStore;
//! use yummy::session::SessionContext;
//! use yummy::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let session = Arc::new(SessionContext::from_config(&config.session)?);
//!     let backend = Arc::new(HttpBackend::from_config(&config.api)?);
//!     let store = Arc::new(ProfileStore::new());
//!
//!     match Dashboard::mount(session, backend, store, &config.profile).await {
//!         Mount::Redirect(navigation) => println!("{:?}", navigation),
//!         Mount::Mounted(dashboard) => println!("{:?}", dashboard.profile().draft()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod avatar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod email_verified;
pub mod error;
pub mod header;
pub mod navigation;
pub mod profile;
pub mod render;
pub mod reservations;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use dashboard::{Dashboard, Mount};
pub use error::{Result, YummyError};
pub use navigation::{Navigation, Route};
pub use session::{GuardOutcome, Session, SessionContext};

#[cfg(test)]
pub mod test_utils;
