//! One run: extract, then transform, then load, each under the stage retry policy.

use serde::Serialize;

use crate::bar::Bar;
use crate::clean::clean;
use crate::fetch::{FetchReport, FetchWindow, Fetcher, TickerOutcome};
use crate::load::load;
use crate::schedule::{run_stage, RetryPolicy, Stage};
use crate::store::StoreConnector;
use crate::EtlError;

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub window: FetchWindow,
    pub outcomes: Vec<TickerOutcome>,
    pub fetched: usize,
    pub cleaned: usize,
    pub loaded: usize,
}

/// Extract and transform output, before anything is written.
#[derive(Debug, Clone)]
pub struct ExtractedBatch {
    pub report: FetchReport,
    /// `None` when nothing was fetched.
    pub cleaned: Option<Vec<Bar>>,
}

impl ExtractedBatch {
    pub fn cleaned_len(&self) -> usize {
        self.cleaned.as_ref().map_or(0, Vec::len)
    }
}

pub struct Pipeline {
    fetcher: Fetcher,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, retry: RetryPolicy) -> Self {
        Self { fetcher, retry }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Runs the Extract and Transform stages only.
    pub async fn extract_and_clean(&self) -> Result<ExtractedBatch, EtlError> {
        let report = run_stage(Stage::Extract, &self.retry, || async {
            Ok::<_, EtlError>(self.fetcher.extract().await)
        })
        .await?;

        let cleaned = run_stage(Stage::Transform, &self.retry, || async {
            Ok::<_, EtlError>(clean(&report.bars))
        })
        .await?;

        Ok(ExtractedBatch { report, cleaned })
    }

    /// Runs all three stages once against `connector`.
    pub async fn run_once<C: StoreConnector>(&self, connector: &C) -> Result<RunReport, EtlError> {
        let batch = self.extract_and_clean().await?;
        let cleaned = batch.cleaned.as_deref();

        let loaded = run_stage(Stage::Load, &self.retry, || async {
            load(connector, cleaned).await.map_err(EtlError::from)
        })
        .await?;

        let failed: Vec<&str> = batch.report.failed_tickers().collect();
        if !failed.is_empty() {
            tracing::warn!("Run finished without data for: {}", failed.join(", "));
        }

        Ok(RunReport {
            window: batch.report.window,
            fetched: batch.report.bars.len(),
            cleaned: batch.cleaned_len(),
            loaded,
            outcomes: batch.report.outcomes,
        })
    }
}
