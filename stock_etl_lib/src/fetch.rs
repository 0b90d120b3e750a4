//! Extract stage: one aggregates request per ticker over a fixed window.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use polygon_api::{AggregatesQuery, Client};
use serde::Serialize;

use crate::bar::FetchedBar;
use crate::config::EtlConfig;

/// The date range a run requested: fixed start, end at invocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDateTime,
}

impl FetchWindow {
    /// A window from `start` through the current UTC wall-clock time.
    pub fn until_now(start: NaiveDate) -> Self {
        Self {
            start,
            end: Utc::now().naive_utc(),
        }
    }
}

/// What happened to one ticker during extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerOutcome {
    Fetched { ticker: String, rows: usize },
    Failed { ticker: String, reason: String },
}

impl TickerOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Fetched { ticker, .. } | TickerOutcome::Failed { ticker, .. } => ticker,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TickerOutcome::Failed { .. })
    }
}

/// Output of the Extract stage.
#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    pub window: FetchWindow,
    /// Bars in ticker order, then in the order the provider returned them.
    pub bars: Vec<FetchedBar>,
    /// One entry per configured ticker, in the same order.
    pub outcomes: Vec<TickerOutcome>,
}

impl FetchReport {
    pub fn failed_tickers(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failure())
            .map(TickerOutcome::ticker)
    }
}

/// Pulls minute bars for a fixed ticker list.
pub struct Fetcher {
    client: Client,
    tickers: Vec<String>,
    start_date: NaiveDate,
    result_limit: u32,
}

impl Fetcher {
    pub fn new(client: Client, tickers: Vec<String>, start_date: NaiveDate, result_limit: u32) -> Self {
        Self {
            client,
            tickers,
            start_date,
            result_limit,
        }
    }

    /// Builds the API client and fetcher described by `config`.
    pub fn from_config(config: &EtlConfig) -> Result<Self, polygon_api::Error> {
        let client = Client::with_base_url(&config.api_base_url, config.api_key.expose())?;
        Ok(Self::new(
            client,
            config.tickers.clone(),
            config.start_date,
            config.result_limit,
        ))
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Fetches the window `[start_date, now]`.
    pub async fn extract(&self) -> FetchReport {
        self.extract_window(FetchWindow::until_now(self.start_date)).await
    }

    /// Fetches every ticker sequentially over `window`.
    ///
    /// A ticker whose request fails is logged, recorded as
    /// [`TickerOutcome::Failed`], and skipped; the remaining tickers still run.
    pub async fn extract_window(&self, window: FetchWindow) -> FetchReport {
        let mut bars = Vec::new();
        let mut outcomes = Vec::with_capacity(self.tickers.len());

        for ticker in &self.tickers {
            let query = AggregatesQuery::new(ticker.as_str(), window.start, window.end.date())
                .with_limit(self.result_limit);

            match self.client.get_aggregates(&query).await {
                Ok(resp) => {
                    let raw = resp.bars();
                    if raw.len() as u64 >= u64::from(self.result_limit) {
                        tracing::warn!(
                            "{} returned {} bars, the request limit; later bars in the window were not fetched",
                            ticker,
                            raw.len()
                        );
                    }
                    bars.extend(raw.iter().map(|b| FetchedBar::from_aggregate(ticker, b)));
                    tracing::debug!("Fetched {} bars for {}", raw.len(), ticker);
                    outcomes.push(TickerOutcome::Fetched {
                        ticker: ticker.clone(),
                        rows: raw.len(),
                    });
                }
                Err(err) => {
                    let reason = match &err {
                        polygon_api::Error::HttpStatus { status, body } => {
                            format!("HTTP {}: {}", status, body)
                        }
                        other => other.to_string(),
                    };
                    tracing::error!("Failed to fetch data for {}: {}", ticker, reason);
                    outcomes.push(TickerOutcome::Failed {
                        ticker: ticker.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            "Fetched {} rows from {} to {}",
            bars.len(),
            window.start,
            window.end.format("%Y-%m-%d %H:%M:%S")
        );

        FetchReport {
            window,
            bars,
            outcomes,
        }
    }
}
