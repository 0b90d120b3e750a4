//! The `run` subcommand: one extract/transform/load pass.

use anyhow::Result;
use clap::Args;
use stock_etl_lib::EtlConfig;

use crate::output::{print_run_report, OutputFormat};

/// Arguments for the `run` subcommand.
#[derive(Args)]
pub struct RunArgs {
    /// Disable stage retries for this run
    #[arg(long)]
    pub no_retry: bool,
}

pub async fn run(args: &RunArgs, config: &EtlConfig, format: &OutputFormat) -> Result<()> {
    let mut config = config.clone();
    if args.no_retry {
        config.schedule.retry = stock_etl_lib::RetryPolicy::none();
    }

    let pipeline = super::build_pipeline(&config)?;
    eprintln!(
        "Running ETL for {} from {}",
        pipeline.fetcher().tickers().join(", "),
        config.start_date
    );

    let report = super::run_against_store(&pipeline, &config.store).await?;
    print_run_report(&report, format);
    Ok(())
}
