//! CLI subcommand implementations.

pub mod extract;
pub mod run;
pub mod schedule;

use anyhow::Result;
use stock_etl_lib::{
    EtlConfig, EtlError, Fetcher, PgConnector, Pipeline, RunReport, SqliteConnector, StoreConnector,
    StoreTarget,
};

/// Builds the pipeline for `config` using its stage retry policy.
pub(crate) fn build_pipeline(config: &EtlConfig) -> Result<Pipeline> {
    let fetcher = Fetcher::from_config(config)?;
    Ok(Pipeline::new(fetcher, config.schedule.retry))
}

/// One full run against whichever store the config selects.
pub(crate) async fn run_against_store(pipeline: &Pipeline, store: &StoreTarget) -> Result<RunReport, EtlError> {
    match store {
        StoreTarget::Postgres(settings) => {
            let connector = PgConnector::from_settings(settings);
            tracing::info!("Writing to {}", connector.describe());
            pipeline.run_once(&connector).await
        }
        StoreTarget::Sqlite(path) => {
            let connector = SqliteConnector::new(path);
            tracing::info!("Writing to {}", connector.describe());
            pipeline.run_once(&connector).await
        }
    }
}
