//! PostgreSQL storage, the production destination.

use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::Connection;

use super::{BarStore, DbError, StoreConnector, TABLE_NAME};
use crate::bar::Bar;
use crate::config::{PostgresSettings, SslMode};

fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
            id SERIAL PRIMARY KEY,
            ticker VARCHAR(10),
            timestamp TIMESTAMP,
            open FLOAT,
            high FLOAT,
            low FLOAT,
            close FLOAT,
            volume BIGINT
        )"
    )
}

fn insert_bar_sql() -> String {
    format!(
        "INSERT INTO {TABLE_NAME} (ticker, timestamp, open, high, low, close, volume)
         VALUES ($1, $2, $3, $4, $5, $6, $7)"
    )
}

pub struct PgStore {
    conn: PgConnection,
}

impl BarStore for PgStore {
    async fn append(&mut self, bars: &[Bar]) -> Result<usize, DbError> {
        let create = create_table_sql();
        let insert = insert_bar_sql();
        let mut tx = self.conn.begin().await?;
        sqlx::query(&create).execute(&mut *tx).await?;
        for bar in bars {
            sqlx::query(&insert)
                .bind(bar.ticker.as_str())
                .bind(bar.timestamp)
                .bind(bar.open)
                .bind(bar.high)
                .bind(bar.low)
                .bind(bar.close)
                .bind(bar.volume)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(bars.len())
    }
}

/// Connects to PostgreSQL with the configured host, credentials, and TLS settings.
pub struct PgConnector {
    options: PgConnectOptions,
    description: String,
}

impl PgConnector {
    pub fn from_settings(settings: &PostgresSettings) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(settings.password.expose())
            .ssl_mode(pg_ssl_mode(settings.ssl_mode));
        if let Some(ca) = &settings.ca_cert_path {
            options = options.ssl_root_cert(ca);
        }
        Self {
            options,
            description: settings.redacted_url(),
        }
    }

    pub fn options(&self) -> &PgConnectOptions {
        &self.options
    }
}

impl StoreConnector for PgConnector {
    type Store = PgStore;

    async fn connect(&self) -> Result<PgStore, DbError> {
        let conn = PgConnection::connect_with(&self.options).await?;
        Ok(PgStore { conn })
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}
