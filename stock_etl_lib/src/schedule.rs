//! Stage retries and the fixed-interval run loop.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::error::EtlError;

/// One of the three units of scheduling and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => f.write_str("extract"),
            Stage::Transform => f.write_str("transform"),
            Stage::Load => f.write_str("load"),
        }
    }
}

/// How often a failed stage is re-run, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// A single attempt, no retry.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

/// Runs `operation` until it succeeds or `policy.retries` retries are used up.
///
/// Each retry re-runs the whole stage from scratch after a fixed delay. The
/// final error is wrapped in [`EtlError::StageFailed`].
pub async fn run_stage<F, Fut, T>(stage: Stage, policy: &RetryPolicy, mut operation: F) -> Result<T, EtlError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EtlError>>,
{
    let attempts = policy.retries + 1;
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                tracing::warn!(
                    "{} stage failed (attempt {}/{}), retrying in {}s: {}",
                    stage,
                    attempt,
                    attempts,
                    policy.delay.as_secs(),
                    err
                );
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(EtlError::StageFailed {
                    stage,
                    attempts,
                    source: Box::new(err),
                })
            }
        }
    }
}

/// Fires a job immediately and then once per interval.
///
/// Ticks missed while a run is still going are skipped, never replayed, so
/// runs never overlap and there is no catch-up.
pub struct Scheduler {
    every: Duration,
}

impl Scheduler {
    pub fn new(every: Duration) -> Self {
        Self { every }
    }

    /// Runs `job` on every tick until `shutdown` resolves. Returns the number of runs started.
    ///
    /// Shutdown also cancels a run in progress by dropping its future; an open
    /// load transaction is rolled back when dropped.
    pub async fn run<F, Fut, S>(&self, mut job: F, shutdown: S) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
        S: Future<Output = ()>,
    {
        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut runs = 0usize;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Scheduler stopping after {} runs", runs);
                    return runs;
                }
                _ = ticker.tick() => {
                    runs += 1;
                    tracing::info!("Starting scheduled run #{}", runs);
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            tracing::warn!("Scheduler stopping, run #{} abandoned mid-flight", runs);
                            return runs;
                        }
                        _ = job() => {}
                    }
                }
            }
        }
    }
}
