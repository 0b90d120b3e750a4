//! SQLite storage for local runs and tests.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::{BarStore, DbError, StoreConnector, TABLE_NAME};
use crate::bar::{Bar, TIMESTAMP_FORMAT};

fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ticker TEXT,
            timestamp TEXT,
            open REAL,
            high REAL,
            low REAL,
            close REAL,
            volume INTEGER
        )"
    )
}

fn insert_bar_sql() -> String {
    format!(
        "INSERT INTO {TABLE_NAME} (ticker, timestamp, open, high, low, close, volume)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    )
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for tests).
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Rows currently in `stock_data`; zero when the table does not exist yet.
    pub fn row_count(&self) -> Result<i64, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            params![TABLE_NAME],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(0);
        }
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"), [], |row| row.get(0))?;
        Ok(count)
    }

    /// Reads every stored bar back in insertion order.
    pub fn all_bars(&self) -> Result<Vec<Bar>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT ticker, timestamp, open, high, low, close, volume FROM {TABLE_NAME} ORDER BY id"
        ))?;
        let rows = stmt.query_map([], |row| {
            let raw_ts: String = row.get(1)?;
            let timestamp = chrono::NaiveDateTime::parse_from_str(&raw_ts, TIMESTAMP_FORMAT)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
                })?;
            Ok(Bar {
                ticker: row.get(0)?,
                timestamp,
                open: row.get(2)?,
                high: row.get(3)?,
                low: row.get(4)?,
                close: row.get(5)?,
                volume: row.get(6)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn append_sync(&mut self, bars: &[Bar]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        tx.execute(&create_table_sql(), [])?;
        {
            let mut stmt = tx.prepare(&insert_bar_sql())?;
            for bar in bars {
                stmt.execute(params![
                    bar.ticker,
                    bar.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume,
                ])?;
            }
        }
        tx.commit()?;
        Ok(bars.len())
    }
}

impl BarStore for SqliteStore {
    async fn append(&mut self, bars: &[Bar]) -> Result<usize, DbError> {
        self.append_sync(bars)
    }
}

/// Opens a fresh [`SqliteStore`] on the configured file for each load.
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoreConnector for SqliteConnector {
    type Store = SqliteStore;

    async fn connect(&self) -> Result<SqliteStore, DbError> {
        SqliteStore::open(&self.path)
    }

    fn describe(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}
