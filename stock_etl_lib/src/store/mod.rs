//! Destination stores for the Load stage.
//!
//! Both backends expose the same contract: create `stock_data` if absent, then
//! insert every bar of the batch inside one transaction. Nothing is updated,
//! merged, or skipped on conflict.

pub mod postgres;
pub mod sqlite;

pub use postgres::{PgConnector, PgStore};
pub use sqlite::{SqliteConnector, SqliteStore};

use crate::bar::Bar;

/// Name of the append-only destination table.
pub const TABLE_NAME: &str = "stock_data";

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("postgres error: {0}")]
    Postgres(#[from] sqlx::Error),
}

/// An open connection to a destination table.
#[allow(async_fn_in_trait)]
pub trait BarStore {
    /// Ensures the table exists and appends `bars` atomically.
    ///
    /// Returns the number of rows inserted. On error the transaction is rolled
    /// back and no row from this batch remains.
    async fn append(&mut self, bars: &[Bar]) -> Result<usize, DbError>;
}

/// Opens [`BarStore`] connections on demand, so an empty batch never touches the database.
#[allow(async_fn_in_trait)]
pub trait StoreConnector {
    type Store: BarStore;

    async fn connect(&self) -> Result<Self::Store, DbError>;

    /// Human-readable destination for log lines. Must not contain secrets.
    fn describe(&self) -> String;
}
