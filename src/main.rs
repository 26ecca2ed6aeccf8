mod api;
mod config;
mod render;
mod view;

use api::{FixtureStatsApi, HttpStatsApi, StatsApi};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;
use view::ProfileSession;

/// Profile View: fetches a contributor's profile and stats from the backend
/// and renders the profile page to the terminal or to an HTML file.
#[derive(Parser, Debug)]
#[command(name = "profile-view", version, about)]
struct Cli {
    /// Username of the profile to show (e.g., alice)
    ///
    /// Not required when --mock is used; defaults to the demo user then.
    username: Option<String>,

    /// Optional output file path for an HTML page
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Backend base URL (overrides PROFILE_VIEW_BASE_URL and .profile-view.toml)
    #[arg(long)]
    base_url: Option<String>,

    /// Use built-in demo profiles instead of a backend (no network needed)
    #[arg(long)]
    r#mock: bool,
}

const DEMO_USERNAME: &str = "alice";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.r#mock {
        info!("using demo profiles");
        let api = FixtureStatsApi::demo()?;
        let username = cli.username.as_deref().unwrap_or(DEMO_USERNAME);
        return show_profile(api, username, &cli)
            .instrument(info_span!("profile_view", username = %username))
            .await;
    }

    let username = cli.username.as_deref().ok_or(
        "username is required unless --mock is used. Usage: profile-view <USERNAME> or profile-view --mock",
    )?;

    info!("loading configuration");
    let config = config::Config::load()?;
    let base_url = config.base_url(cli.base_url.as_deref())?;
    debug!(base_url = %base_url, authenticated = config.api.token.is_some(), "resolved backend");

    let api = HttpStatsApi::new(reqwest::Client::new(), &base_url, config.api.token.clone())?;
    show_profile(api, username, &cli)
        .instrument(info_span!("profile_view", username = %username))
        .await
}

/// Load one profile through `api` and write the resulting page.
async fn show_profile<A: StatsApi + 'static>(
    api: A,
    username: &str,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = ProfileSession::new(Arc::new(api));

    info!("fetching profile");
    let applied = session.navigate(username).await.await?;
    debug!(applied, "fetch finished");

    let view = session.view();
    let view = view.lock().await;

    info!("rendering profile");
    render::output(&view, cli.output.as_deref())?;
    info!(title = view.title().unwrap_or_default(), "done");

    Ok(())
}
