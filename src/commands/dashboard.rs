//! Dashboard command handler
//!
//! Mounts the dashboard, prints the profile and reservations, and with
//! `--interactive` runs a readline loop driving the profile editor.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::dashboard_commands::{parse_dashboard_command, print_help, DashboardCommand};
use super::AppContext;
use crate::avatar::StagedFile;
use crate::dashboard::{Dashboard, Mount};
use crate::error::Result;
use crate::header::Header;
use crate::render::{
    render_acknowledgment, render_header, render_navigation, render_profile, render_reservations,
};

/// Mount the dashboard and optionally open the interactive editor
///
/// # Arguments
///
/// * `ctx` - Application context
/// * `interactive` - Whether to start the line editor after printing
pub async fn run_dashboard(ctx: &AppContext, interactive: bool) -> Result<()> {
    let mount = Dashboard::mount(
        ctx.session.clone(),
        ctx.backend.clone(),
        ctx.profiles.clone(),
        &ctx.config.profile,
    )
    .await;

    let dashboard = match mount {
        Mount::Redirect(navigation) => {
            println!("{}", render_navigation(&navigation));
            return Ok(());
        }
        Mount::Mounted(dashboard) => dashboard,
    };

    print_dashboard(&dashboard);

    if interactive {
        run_editor(ctx, dashboard).await?;
    }
    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("{}", render_profile(dashboard.profile()));
    println!("{}", render_reservations(dashboard.reservations().view()));
}

async fn run_editor(ctx: &AppContext, mut dashboard: Dashboard) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut header = Header::new(
        ctx.session.clone(),
        ctx.backend.clone(),
        ctx.profiles.clone(),
        ctx.config.profile.default_image_sentinel.clone(),
    );
    println!(
        "Type {} for commands, {} to leave.",
        "help".cyan(),
        "quit".cyan()
    );

    loop {
        match rl.readline("dashboard> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let command = match parse_dashboard_command(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}\n", e);
                        continue;
                    }
                };

                match command {
                    DashboardCommand::Set(field, value) => {
                        dashboard.profile_mut().edit_field(field, value);
                        println!("{}", render_profile(dashboard.profile()));
                    }
                    DashboardCommand::Avatar(path) => match StagedFile::from_path(&path).await {
                        Ok(file) => {
                            dashboard.profile_mut().select_avatar(file);
                            println!("{}", render_profile(dashboard.profile()));
                        }
                        Err(e) => eprintln!("{}\n", e),
                    },
                    DashboardCommand::ClearAvatar => {
                        dashboard.profile_mut().clear_avatar();
                        println!("{}", render_profile(dashboard.profile()));
                    }
                    DashboardCommand::Cancel => {
                        dashboard.profile_mut().cancel();
                        println!("{}", render_profile(dashboard.profile()));
                    }
                    DashboardCommand::Save => match dashboard.profile_mut().save().await {
                        Ok(ack) => {
                            println!("{}", render_acknowledgment(&ack));
                            if header.follow_store() {
                                println!("{}", render_header(&header));
                            }
                            println!("{}", render_profile(dashboard.profile()));
                        }
                        Err(e) => eprintln!("{}\n", e),
                    },
                    DashboardCommand::Show => {
                        println!("{}", render_profile(dashboard.profile()));
                    }
                    DashboardCommand::Reservations => {
                        dashboard.reload_reservations().await;
                        println!("{}", render_reservations(dashboard.reservations().view()));
                    }
                    DashboardCommand::Logout => {
                        let navigation = dashboard.logout()?;
                        println!("{}", render_navigation(&navigation));
                        return Ok(());
                    }
                    DashboardCommand::Help => print_help(),
                    DashboardCommand::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
