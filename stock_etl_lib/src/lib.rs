//! Library layer for the stock bar ETL: configuration, the extract/transform/load
//! stages, destination stores, and the retrying scheduler.
//!
//! A run fetches minute bars for each configured ticker from Polygon, drops
//! incomplete and duplicate bars within the batch, and appends the rest to the
//! `stock_data` table.

pub mod bar;
pub mod clean;
pub mod config;
pub mod error;
pub mod fetch;
pub mod load;
pub mod pipeline;
pub mod schedule;
pub mod store;

pub use polygon_api;

pub use bar::{Bar, FetchedBar};
pub use clean::clean;
pub use config::{ConfigError, EtlConfig, StoreTarget};
pub use error::EtlError;
pub use fetch::{FetchReport, FetchWindow, Fetcher, TickerOutcome};
pub use load::load;
pub use pipeline::{ExtractedBatch, Pipeline, RunReport};
pub use schedule::{run_stage, RetryPolicy, Scheduler, Stage};
pub use store::{BarStore, DbError, PgConnector, SqliteConnector, SqliteStore, StoreConnector};
