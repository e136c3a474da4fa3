//! Command parser for the interactive dashboard
//!
//! Lines typed at the `dashboard>` prompt map onto profile-editor and
//! dashboard operations:
//!
//! - `set <field> <value>` - change one profile field (value may be empty)
//! - `avatar <path>` - stage an image file for upload
//! - `clear-avatar` - remove the displayed avatar
//! - `cancel`, `save`, `show`, `reservations`, `logout`, `help`
//! - `quit` / `exit` - leave the editor
//!
//! Command names are case-insensitive.

use std::path::PathBuf;

use thiserror::Error;

use crate::profile::ProfileField;

/// Errors that can occur when parsing dashboard commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType 'help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType 'help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Operations available at the dashboard prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Replace one draft field
    Set(ProfileField, String),
    /// Stage an image file as the new avatar
    Avatar(PathBuf),
    /// Remove the displayed avatar and any staged file
    ClearAvatar,
    /// Discard the draft
    Cancel,
    /// Send the draft to the backend
    Save,
    /// Print the profile form
    Show,
    /// Reload and print the reservations
    Reservations,
    /// Sign out and leave
    Logout,
    /// Print the command list
    Help,
    /// Leave the editor
    Quit,
}

/// Parse one line typed at the dashboard prompt
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands, unknown field names and
/// missing arguments.
///
/// # Examples
///
/// ```
/// use yummy::commands::dashboard_commands::{parse_dashboard_command, DashboardCommand};
/// use yummy::profile::ProfileField;
///
/// let cmd = parse_dashboard_command("set phone 09120000000").unwrap();
/// assert_eq!(cmd, DashboardCommand::Set(ProfileField::PhoneNumber, "09120000000".to_string()));
///
/// assert_eq!(parse_dashboard_command("SAVE").unwrap(), DashboardCommand::Save);
/// assert!(parse_dashboard_command("dance").is_err());
/// ```
pub fn parse_dashboard_command(input: &str) -> Result<DashboardCommand, CommandError> {
    let trimmed = input.trim();
    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    match name.to_lowercase().as_str() {
        "set" => parse_set(rest),
        "avatar" => {
            if rest.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "avatar".to_string(),
                    usage: "avatar <path>".to_string(),
                })
            } else {
                Ok(DashboardCommand::Avatar(PathBuf::from(rest)))
            }
        }
        "clear-avatar" => Ok(DashboardCommand::ClearAvatar),
        "cancel" => Ok(DashboardCommand::Cancel),
        "save" => Ok(DashboardCommand::Save),
        "show" => Ok(DashboardCommand::Show),
        "reservations" => Ok(DashboardCommand::Reservations),
        "logout" => Ok(DashboardCommand::Logout),
        "help" | "?" => Ok(DashboardCommand::Help),
        "quit" | "exit" => Ok(DashboardCommand::Quit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn parse_set(rest: &str) -> Result<DashboardCommand, CommandError> {
    let (field, value) = match rest.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (rest, ""),
    };
    if field.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "set".to_string(),
            usage: "set <first_name|last_name|phone_number> [value]".to_string(),
        });
    }
    let field = field
        .parse::<ProfileField>()
        .map_err(|_| CommandError::UnsupportedArgument {
            command: "set".to_string(),
            arg: field.to_string(),
        })?;
    let value = value.trim_matches('"');
    Ok(DashboardCommand::Set(field, value.to_string()))
}

/// Print the dashboard command list
pub fn print_help() {
    use colored::Colorize;

    println!("\n{}", "Dashboard commands".bold());
    println!("  set <field> <value>   Change first_name, last_name or phone_number");
    println!("  avatar <path>         Stage an image as the new avatar");
    println!("  clear-avatar          Remove the avatar (applied on save)");
    println!("  cancel                Discard the draft");
    println!("  save                  Save the profile");
    println!("  show                  Show the profile form");
    println!("  reservations          Reload your reservations");
    println!("  logout                Sign out");
    println!("  quit                  Leave the dashboard\n");
}
