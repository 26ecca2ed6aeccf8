pub mod badge;
pub mod html;

use crate::api::UserData;
use crate::view::{ProfileView, ViewBranch};
use badge::{status_badge, BadgeColor};
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write profile page: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Output the profile view to the terminal (default) or to an HTML file.
#[instrument(skip(view), fields(username = view.username().unwrap_or_default()))]
pub fn output(view: &ProfileView, output_path: Option<&Path>) -> Result<(), RenderError> {
    match output_path {
        None => {
            debug!("writing profile to terminal");
            print!("{}", format_terminal(view));
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing profile page to file");
            std::fs::write(path, html::render_page(view))?;
            Ok(())
        }
    }
}

/// Terminal rendition of the page:
///
/// Profile | Alice
///
/// [A] Alice
///     ⎇ alice
///     hi
///
/// Points: 10 | Merged PRs: 2 | Repositories: 3 | Followers: 4 | Following: 5
///
/// ═══ Recent Pull Requests ═══
///   ⎇ Fix bug  [Merged]
///     /pr/1
fn format_terminal(view: &ProfileView) -> String {
    match view.branch() {
        ViewBranch::Error(message) => format!("\n  {}\n\n", message.bold()),
        ViewBranch::Loading => format!("\n  {}\n\n", "Loading profile...".dimmed()),
        ViewBranch::Profile(data) => format_profile(view.title().unwrap_or_default(), data),
    }
}

fn format_profile(title: &str, data: &UserData) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n\n", title.bold()));

    let initial = data.initial().map(String::from).unwrap_or_default();
    out.push_str(&format!("[{}] {}\n", initial, data.name.bold()));
    out.push_str(&format!("    {} {}\n", "⎇".dimmed(), data.username.dimmed()));
    if let Some(bio) = data.bio.as_deref().filter(|b| !b.is_empty()) {
        out.push_str(&format!("    {}\n", bio.dimmed()));
    }
    out.push('\n');

    let cells: Vec<String> = data
        .stats_strip()
        .iter()
        .map(|(label, value)| format!("{}: {}", label.dimmed(), value.bold()))
        .collect();
    out.push_str(&cells.join(" | "));
    out.push_str("\n\n");

    out.push_str("═══ Recent Pull Requests ═══\n");
    if data.prs.is_empty() {
        out.push_str("  No pull requests.\n");
    }
    for pr in &data.prs {
        let badge = status_badge(&pr.state);
        out.push_str(&format!(
            "  {} {}  {}\n",
            "⎇".dimmed(),
            pr.title,
            colorize_badge(&badge.label, badge.color)
        ));
        out.push_str(&format!("    {}\n", pr.url.dimmed()));
    }
    out.push('\n');
    out
}

fn colorize_badge(label: &str, color: BadgeColor) -> colored::ColoredString {
    let tag = format!("[{label}]");
    match color {
        BadgeColor::Purple => tag.purple().bold(),
        BadgeColor::Green => tag.green().bold(),
        BadgeColor::Red => tag.red().bold(),
        BadgeColor::Gray => tag.bright_black().bold(),
    }
}
