//! Terminal rendering of the views
//!
//! Every function returns a `String` so the command handlers decide where
//! it goes and tests can inspect it.

use chrono::{DateTime, FixedOffset};
use colored::Colorize;
use prettytable::{format, Table};

use crate::api::Reservation;
use crate::avatar::AvatarRef;
use crate::email_verified::{VerificationPage, VerificationStatus};
use crate::header::{AuthAffordance, Header, Section};
use crate::navigation::Navigation;
use crate::profile::{Acknowledgment, ProfileField, ProfileSync, SyncState};
use crate::reservations::ReservationView;

/// Formats a creation timestamp the way US-English locales print it,
/// e.g. `5/1/2024, 12:05:09 PM`.
pub fn format_created(created: &DateTime<FixedOffset>) -> String {
    created.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Navigation bar with the auth affordance.
pub fn render_header(header: &Header) -> String {
    let sections: Vec<String> = Section::all()
        .iter()
        .map(|section| {
            if *section == header.active() {
                section.label().bold().underline().to_string()
            } else {
                section.label().to_string()
            }
        })
        .collect();

    let mut out = format!("{}  {}", "Yummy".red().bold(), sections.join("  "));
    match header.auth_affordance() {
        AuthAffordance::LoginLink => {
            out.push_str(&format!("  [{}]", "Login".cyan()));
        }
        AuthAffordance::LogoutButton => {
            let indicator = header.indicator();
            let avatar = indicator.avatar.as_deref().unwrap_or("(no avatar)");
            out.push_str(&format!("  [{}] {}", "Logout".cyan(), avatar.dimmed()));
            if let Some(email) = &indicator.email {
                out.push_str(&format!(" {}", email));
            }
        }
    }
    out
}

/// Profile form with the current draft and avatar.
pub fn render_profile(profile: &ProfileSync) -> String {
    if profile.state() == SyncState::Loading {
        return "Loading profile...".dimmed().to_string();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["Field".bold(), "Value".bold()]);
    for field in ProfileField::all() {
        table.add_row(prettytable::row![field.as_str().cyan(), profile.draft().get(field)]);
    }

    let avatar = match profile.avatar() {
        AvatarRef::None => "(empty avatar)".to_string(),
        AvatarRef::Remote(url) => url.clone(),
        AvatarRef::Preview(handle) => format!("{} (preview of {})", handle.url(), handle.file_name()),
    };
    table.add_row(prettytable::row!["image".cyan(), avatar]);

    let mut out = format!("{}\n{}", "User Profile".bold(), table);
    match profile.state() {
        SyncState::Editing => out.push_str(&"Unsaved changes.\n".yellow().to_string()),
        SyncState::Saving => out.push_str("Saving...\n"),
        _ => {}
    }
    if profile.is_degraded() {
        out.push_str(&"Profile could not be loaded.\n".yellow().to_string());
    }
    out
}

/// Reservation cards, the empty message, or the loading indicator.
pub fn render_reservations(view: ReservationView<'_>) -> String {
    match view {
        ReservationView::Spinner => "Loading...".dimmed().to_string(),
        ReservationView::Empty => "No reservations found.".yellow().to_string(),
        ReservationView::Items(items) => {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "Reservation".bold(),
                "Date".bold(),
                "Time".bold(),
                "People".bold(),
                "Created At".bold(),
                "Email".bold(),
                "Phone".bold()
            ]);
            for (index, reservation) in items.iter().enumerate() {
                table.add_row(reservation_row(index + 1, reservation));
            }
            format!("{}\n{}", "My Reservations".bold(), table)
        }
    }
}

/// `position` is 1-based order in the list, not the backend id.
fn reservation_row(position: usize, reservation: &Reservation) -> prettytable::Row {
    prettytable::row![
        format!("Reservation #{}", position).cyan(),
        reservation.date,
        reservation.time,
        reservation.people,
        format_created(&reservation.created_date),
        reservation.email,
        reservation.phone.as_deref().unwrap_or("-")
    ]
}

/// One-line save result.
pub fn render_acknowledgment(ack: &Acknowledgment) -> String {
    match ack {
        Acknowledgment::Saved => ack.message().green().to_string(),
        Acknowledgment::Failed(_) => ack.message().red().to_string(),
    }
}

/// Verification heading, message and countdown.
pub fn render_verification(page: &VerificationPage) -> String {
    let title = match page.status() {
        VerificationStatus::Success => page.title().green().bold(),
        VerificationStatus::Failure => page.title().red().bold(),
    };
    format!(
        "{}\n{}\nRedirecting to login in {} seconds...",
        title,
        page.message(),
        page.remaining()
    )
}

/// Describes a navigation intent for the terminal.
pub fn render_navigation(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Redirect(route) => format!("Redirecting to {}", route),
        Navigation::Reload => "Reloading".to_string(),
        Navigation::Scroll(anchor) => format!("Scrolling to #{}", anchor),
        Navigation::RedirectThenScroll(route, anchor) => {
            format!("Redirecting to {}#{}", route, anchor)
        }
    }
}
