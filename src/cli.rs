//! Command-line interface definition for Yummy
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the header, dashboard, profile editing,
//! session management, and the email-verification landing page.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Yummy - restaurant dashboard client
///
/// Browse your reservations and manage your profile on a Yummy backend
/// from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "yummy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend base URL (e.g. http://127.0.0.1:8000)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Override the session file location (file backend only)
    #[arg(long)]
    pub session_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Yummy
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the navigation header for the current session
    Header {
        /// Section to mark as active (hero, about, menu, events, chefs, gallery, contact)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Open the user dashboard (profile and reservations)
    Dashboard {
        /// Open an interactive editor for the profile
        #[arg(short, long)]
        interactive: bool,
    },

    /// Edit the profile and save it in one step
    Profile {
        /// Profile subcommand
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Manage the locally stored session
    Session {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Clear the locally stored session
    Logout,

    /// Show the email-verification landing page and redirect to login
    VerifyEmail {
        /// Verification status as passed by the backend redirect
        #[arg(long, conflicts_with = "query")]
        status: Option<String>,

        /// Raw query string of the landing URL (e.g. "status=success")
        #[arg(long)]
        query: Option<String>,

        /// Skip the countdown delay
        #[arg(long)]
        no_wait: bool,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Load the profile, apply the given edits, and save
    Update {
        /// New first name
        #[arg(long)]
        first_name: Option<String>,

        /// New last name
        #[arg(long)]
        last_name: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,

        /// Image file to upload as the new avatar
        #[arg(long, conflicts_with = "clear_image")]
        image: Option<PathBuf>,

        /// Remove the current avatar
        #[arg(long)]
        clear_image: bool,
    },
}

/// Session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// Store tokens issued by the backend login endpoint
    Import {
        /// Access token
        #[arg(long)]
        access: String,

        /// Refresh token
        #[arg(long)]
        refresh: Option<String>,
    },

    /// Show whether a session is stored
    Status,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            api_base: None,
            session_path: None,
            command: Commands::Session {
                command: SessionCommand::Status,
            },
        }
    }
}
