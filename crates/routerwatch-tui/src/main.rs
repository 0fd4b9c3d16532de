//! `routerwatch`: terminal dashboard polling per-router graph endpoints.
//!
//! Each opened router gets a panel that refetches on a fixed interval and
//! charts the `Qst`/`Dst` statistics against their `UCLq`/`UCLd` limits on
//! a log scale. Panels can be paused, resumed, expanded, and closed
//! independently.
//!
//! Logs go to a file (default `/tmp/routerwatch.log`) so they never corrupt
//! the terminal.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod view;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use routerwatch_api::DEFAULT_PLACEHOLDER;
use routerwatch_config::{
    Defaults, Profile, config_path, load_config, profile_to_dashboard_config, save_profile,
};
use routerwatch_core::{ChartBoard, DashboardConfig, PanelController, RouterId};

use crate::app::App;

/// Terminal dashboard for per-router poll-and-chart monitoring.
#[derive(Parser, Debug)]
#[command(name = "routerwatch", version, about)]
struct Cli {
    /// Config profile to use (defaults to the file's `default_profile`)
    #[arg(short, long, env = "ROUTERWATCH_PROFILE")]
    profile: Option<String>,

    /// Graph URL template; overrides the profile (e.g. https://noc/graph/none)
    #[arg(short = 'u', long, env = "ROUTERWATCH_URL")]
    url: Option<String>,

    /// Token in the URL template replaced by the router id
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    placeholder: String,

    /// Router to list (repeatable); overrides the profile's list
    #[arg(short, long = "router")]
    routers: Vec<String>,

    /// Poll interval, e.g. "30s" or "2m"
    #[arg(short, long, value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Save --url, --placeholder, --router and --interval as a named profile, then exit
    #[arg(long, value_name = "NAME")]
    save_profile: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/routerwatch.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may go to stdout/stderr while the TUI is up.
/// Hold the returned guard until exit so buffered lines get flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "routerwatch={log_level},routerwatch_core={log_level},routerwatch_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("routerwatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the dashboard config. Priority: CLI flags > profile > defaults.
fn build_config(cli: &Cli) -> Result<DashboardConfig> {
    let file = load_config()
        .wrap_err_with(|| format!("failed to load {}", config_path().display()))?;

    let mut config = match (&cli.url, file.profile(cli.profile.as_deref())) {
        (Some(url), Ok((_, profile))) => profile_to_dashboard_config(
            &Profile {
                graph_url: url.clone(),
                placeholder: Some(cli.placeholder.clone()),
                ..profile.clone()
            },
            &file.defaults,
        )?,
        (Some(url), Err(_)) => profile_to_dashboard_config(
            &Profile {
                graph_url: url.clone(),
                placeholder: Some(cli.placeholder.clone()),
                ..Profile::default()
            },
            &file.defaults,
        )?,
        (None, Ok((name, profile))) => profile_to_dashboard_config(profile, &file.defaults)
            .wrap_err_with(|| format!("profile '{name}' is invalid"))?,
        (None, Err(e)) => {
            return Err(e).wrap_err("no graph URL: pass --url or configure a profile");
        }
    };

    if !cli.routers.is_empty() {
        config.routers = cli
            .routers
            .iter()
            .map(RouterId::new)
            .collect::<Result<_, _>>()?;
    }
    if let Some(every) = cli.interval {
        if every.is_zero() {
            color_eyre::eyre::bail!("--interval must be greater than zero");
        }
        config.poll_interval = every;
    }
    Ok(config)
}

/// Profile built from the CLI flags alone.
fn profile_from_cli(cli: &Cli) -> Result<Profile> {
    let Some(url) = &cli.url else {
        color_eyre::eyre::bail!("--save-profile needs --url");
    };
    Ok(Profile {
        graph_url: url.clone(),
        placeholder: Some(cli.placeholder.clone()),
        routers: cli.routers.clone(),
        poll_interval_secs: cli.interval.map(|every| every.as_secs()),
        ..Profile::default()
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(name) = &cli.save_profile {
        let profile = profile_from_cli(&cli)?;
        profile_to_dashboard_config(&profile, &Defaults::default())
            .wrap_err("refusing to save an invalid profile")?;
        save_profile(name, profile)?;
        println!("saved profile '{name}' to {}", config_path().display());
        return Ok(());
    }

    // Hooks first so a failure during terminal setup still prints cleanly
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_config(&cli)?;
    info!(
        url = %config.graph_url,
        routers = config.routers.len(),
        interval = %humantime::format_duration(config.poll_interval),
        "starting routerwatch"
    );

    let board = Arc::new(ChartBoard::new());
    let controller = PanelController::from_config(config, board)?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
