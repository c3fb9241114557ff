use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use travel_planner::aggregator::Aggregator;
use travel_planner::config::PlannerConfig;
use travel_planner::query::{DateRange, Query, Theme};
use travel_planner::{http, telemetry, web};

/// Multi-source travel data aggregation
#[derive(Debug, Parser)]
#[command(name = "travel-planner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TRAVEL_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to listen on, overriding the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Aggregate data for one destination and print it as JSON
    Plan {
        #[arg(short, long)]
        destination: String,

        /// cultural, adventure, spiritual, luxury, food or any
        #[arg(short, long, default_value = "any")]
        theme: Theme,

        /// First travel day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last travel day (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlannerConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    let _telemetry = telemetry::init(&config.logging, cli.verbose);

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(config).await
        }
        Command::Plan {
            destination,
            theme,
            start,
            end,
            pretty,
        } => plan(&config, destination, theme, &start, &end, pretty).await,
    }
}

async fn plan(
    config: &PlannerConfig,
    destination: String,
    theme: Theme,
    start: &str,
    end: &str,
    pretty: bool,
) -> Result<()> {
    let range = DateRange::parse(start, end)?;
    let query = Query::new(destination, theme, range)?;

    let client = http::build_client()?;
    let aggregator = Aggregator::from_config(config, http::source_client(client));
    let aggregate = aggregator.aggregate(&query).await;

    let output = if pretty {
        serde_json::to_string_pretty(&aggregate)
    } else {
        serde_json::to_string(&aggregate)
    }
    .context("Failed to serialize aggregate")?;
    println!("{output}");
    Ok(())
}
