//! The `extract` subcommand: fetch and clean, write nothing.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use stock_etl_lib::EtlConfig;

use crate::output::{print_extracted, OutputFormat};

/// Arguments for the `extract` subcommand.
#[derive(Args)]
pub struct ExtractArgs {
    /// Only fetch these tickers (comma-separated), overriding STOCK_TICKERS
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// Override the window start date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,
}

pub async fn run(args: &ExtractArgs, config: &EtlConfig, format: &OutputFormat) -> Result<()> {
    let mut config = config.clone();
    let tickers: Vec<String> = args
        .tickers
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();
    if !tickers.is_empty() {
        config.tickers = tickers;
    }
    if let Some(since) = args.since {
        config.start_date = since;
    }

    let pipeline = super::build_pipeline(&config)?;
    let batch = pipeline.extract_and_clean().await?;
    print_extracted(&batch, format);
    Ok(())
}
