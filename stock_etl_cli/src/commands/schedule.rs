//! The `schedule` subcommand: run now, then on every interval until Ctrl-C.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use stock_etl_lib::{EtlConfig, Scheduler};

/// Arguments for the `schedule` subcommand.
#[derive(Args)]
pub struct ScheduleArgs {
    /// Override the run interval in seconds (ETL_SCHEDULE_INTERVAL_SECS)
    #[arg(long)]
    pub interval_secs: Option<u64>,
}

pub async fn run(args: &ScheduleArgs, config: &EtlConfig) -> Result<()> {
    let every = match args.interval_secs {
        Some(0) => bail!("--interval-secs must be greater than zero"),
        Some(secs) => Duration::from_secs(secs),
        None => config.schedule.interval,
    };

    let pipeline = super::build_pipeline(config)?;
    eprintln!(
        "Scheduling ETL for {} every {}s (Ctrl-C to stop)",
        pipeline.fetcher().tickers().join(", "),
        every.as_secs()
    );

    let job = || async {
        match super::run_against_store(&pipeline, &config.store).await {
            Ok(report) => tracing::info!(
                "Run complete: fetched {}, cleaned {}, loaded {}",
                report.fetched,
                report.cleaned,
                report.loaded
            ),
            Err(err) => tracing::error!("Run failed: {}", err),
        }
    };

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl-C, running until killed: {}", err);
            std::future::pending::<()>().await;
        }
    };

    let runs = Scheduler::new(every).run(job, shutdown).await;
    eprintln!("Stopped after {} run(s)", runs);
    Ok(())
}
