#![warn(clippy::all)]
#![allow(clippy::pedantic)]

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use stockpick_common::config::expand_path;
use stockpick_common::logging::init_logging_with_exclusions;
use stockpick_common::validation::Validate;
use tracing::{info, warn};

use stockpick_engine::portfolio::{render_alerts, AlertEngine, AlertSummary};
use stockpick_engine::screener::{ReportFormat, ScreenerEngine, ScreenerReport, Strategy};
use stockpick_engine::{EngineConfig, InputBundle};

/// Stockpick - screen a stock universe and check open positions.
#[derive(Parser, Debug)]
#[command(name = "stockpick")]
#[command(version)]
#[command(about = "Deterministic stock screener and position alerts.", long_about = None)]
struct Cli {
    /// Config file (default: $STOCKPICK_CONFIG or ~/.stockpick/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output format (markdown, json)
    #[arg(short, long, global = true, default_value = "markdown")]
    format: ReportFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Screen the input universe with one strategy
    Screen {
        /// Input JSON bundle (snapshots, references, optional allow_list)
        #[arg(short, long)]
        input: String,

        /// Strategy (breakout, long_term, day_trade, value, growth)
        #[arg(short, long)]
        strategy: Strategy,

        /// Ignore the bundle's allow-list and screen every snapshot
        #[arg(long)]
        no_allow_list: bool,
    },

    /// Evaluate alerts for the bundle's holdings
    Alerts {
        /// Input JSON bundle (snapshots, holdings)
        #[arg(short, long)]
        input: String,

        /// Evaluation date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let explicit = cli.config.as_deref().map(expand_path);
    let (config, source) = EngineConfig::load_with_source(explicit.as_deref())?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );
    info!(source = %source, "Configuration loaded");
    for (key, value) in EngineConfig::rejected_env_overrides() {
        warn!(key, value = %value, "Ignoring non-numeric environment override");
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    match cli.command {
        Commands::Screen {
            input,
            strategy,
            no_allow_list,
        } => {
            let bundle = load_bundle(&expand_path(&input))?;
            let engine = ScreenerEngine::new(config.screening.clone(), config.quality_gate.clone());
            let allow_list = if no_allow_list {
                None
            } else {
                bundle.allow_list.as_ref()
            };

            let result = engine.screen_filtered(
                &bundle.snapshots,
                &bundle.references,
                strategy,
                &config.settings,
                allow_list,
            );
            info!(summary = %result.summary(), "Screen complete");

            println!("{}", ScreenerReport::new(&result).generate(cli.format));
        }

        Commands::Alerts { input, date } => {
            let bundle = load_bundle(&expand_path(&input))?;
            let as_of = date.unwrap_or_else(|| Local::now().date_naive());

            let alerts = AlertEngine::default().evaluate_all(
                &bundle.holdings,
                &bundle.snapshots,
                &config.settings,
                as_of,
            );
            let summary = AlertSummary::from_alerts(&alerts);
            info!(
                date = %as_of,
                holdings = bundle.holdings.len(),
                alerts = summary.total(),
                actionable = summary.actionable(),
                "Alert pass complete"
            );

            println!("{}", render_alerts(&alerts, cli.format));
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_bundle(path: &Path) -> Result<InputBundle> {
    InputBundle::from_path(path)
        .with_context(|| format!("Failed to load input bundle from {}", path.display()))
}
