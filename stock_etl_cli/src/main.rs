mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stock_etl_lib::EtlConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stock-etl")]
#[command(about = "Pull minute bars from Polygon and append them to the stock_data table")]
struct Cli {
    /// Output format: table, json, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Write to this SQLite file instead of PostgreSQL (overrides ETL_SQLITE_PATH)
    #[arg(long, global = true)]
    sqlite: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one extract/transform/load run
    Run(commands::run::RunArgs),
    /// Run now, then again on every interval until Ctrl-C (which also cancels a run in progress)
    Schedule(commands::schedule::ScheduleArgs),
    /// Fetch and clean without writing anything
    Extract(commands::extract::ExtractArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stock_etl=info".parse()?)
                .add_directive("stock_etl_lib=info".parse()?),
        )
        .with_target(false)
        .init();

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", err);
        }
    }

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = load_config(cli.sqlite.as_deref())?;

    match &cli.command {
        Commands::Run(args) => commands::run::run(args, &config, &format).await?,
        Commands::Schedule(args) => commands::schedule::run(args, &config).await?,
        Commands::Extract(args) => commands::extract::run(args, &config, &format).await?,
    }

    Ok(())
}

/// Reads the environment, letting `--sqlite` stand in for `ETL_SQLITE_PATH`.
fn load_config(sqlite: Option<&std::path::Path>) -> Result<EtlConfig> {
    let sqlite = sqlite.map(|p| p.display().to_string());
    let config = EtlConfig::from_lookup(|key| match (key, &sqlite) {
        ("ETL_SQLITE_PATH", Some(path)) => Some(path.clone()),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}
