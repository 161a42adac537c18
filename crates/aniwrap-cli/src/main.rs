//! Command line entry point for aniwrap

use anyhow::Context;
use aniwrap_charts::{render_bar_chart, ChartStyle};
use aniwrap_common::logging::init_logging;
use aniwrap_common::models::YearWindow;
use aniwrap_common::AnilistClient;
use aniwrap_config::{ChartSettings, Config, ConfigLoader};
use aniwrap_stats::{build_report, AnilistSource, WrappedReport};
use clap::Parser;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::info;

mod output;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// AniList username the report is built for
    username: Option<String>,

    /// Report year, defaults to the current year
    #[arg(short, long)]
    year: Option<i32>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Directory chart files are written into
    #[arg(long)]
    output_dir: Option<String>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Skip writing chart files
    #[arg(long)]
    no_charts: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    apply_cli_overrides(&mut config, &args);
    ConfigLoader::validate(&config)
        .context("Invalid configuration after command line overrides")?;

    // Initialize logging
    init_logging(config.logging.logging_config())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting aniwrap");

    let Some(username) = config.report.username.clone() else {
        anyhow::bail!(
            "An AniList username is required: pass one as an argument \
             or set report.username in the configuration file"
        );
    };
    let year = config.report.year;

    let client = AnilistClient::new(config.anilist.client_config())?;
    let user_id = client.resolve_user_id(&username).await?;
    let source = AnilistSource::new(&client, user_id, YearWindow::new(year));

    let report = build_report(&source, &username, year).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", output::render_text(&report));
    }

    if config.charts.enabled {
        write_charts(&report, &config).await?;
    }

    Ok(())
}

/// Command line arguments win over file and environment configuration
fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(username) = &args.username {
        config.report.username = Some(username.clone());
    }
    if let Some(year) = args.year {
        config.report.year = year;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.charts.output_dir = dir.clone();
    }
    if args.no_charts {
        config.charts.enabled = false;
    }
}

async fn write_charts(report: &WrappedReport, config: &Config) -> anyhow::Result<()> {
    let dir = Path::new(&config.charts.output_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create chart directory {}", dir.display()))?;

    let style = chart_style(&config.charts);
    let charts = vec![
        (
            output::watch_time_chart(report),
            chart_path(dir, "watch_time", report.year),
        ),
        (
            output::distribution_chart(report),
            chart_path(dir, "score_distribution", report.year),
        ),
        (
            output::theme_chart(report),
            chart_path(dir, "top_themes", report.year),
        ),
    ];

    try_join_all(
        charts
            .iter()
            .map(|(spec, path)| render_bar_chart(spec, &style, path)),
    )
    .await?;

    info!("Wrote {} chart files to {}", charts.len(), dir.display());
    Ok(())
}

fn chart_style(settings: &ChartSettings) -> ChartStyle {
    ChartStyle {
        width: settings.width,
        height: settings.height,
        background_color: settings.background_color.clone(),
        bar_color: settings.bar_color.clone(),
        font_family: settings.font_family.clone(),
        font_size: settings.font_size,
        ..ChartStyle::default()
    }
}

fn chart_path(dir: &Path, name: &str, year: i32) -> PathBuf {
    dir.join(format!("{name}_{year}.png"))
}
