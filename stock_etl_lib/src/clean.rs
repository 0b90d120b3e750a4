//! Transform stage: drop incomplete bars and in-batch duplicates.

use std::collections::HashSet;

use crate::bar::{Bar, FetchedBar};

/// Cleans one run's fetched batch.
///
/// Returns `None` for an empty input so the Load stage can skip the database
/// entirely. Otherwise keeps, in input order, every fully-populated bar whose
/// `(ticker, timestamp)` has not been seen earlier in this batch. Nothing
/// already persisted is consulted.
pub fn clean(fetched: &[FetchedBar]) -> Option<Vec<Bar>> {
    if fetched.is_empty() {
        tracing::info!("No data fetched.");
        return None;
    }

    let complete: Vec<Bar> = fetched.iter().filter_map(FetchedBar::complete).collect();
    let incomplete = fetched.len() - complete.len();

    let mut seen = HashSet::with_capacity(complete.len());
    let cleaned: Vec<Bar> = complete
        .into_iter()
        .filter(|bar| seen.insert((bar.ticker.clone(), bar.timestamp)))
        .collect();
    let duplicates = fetched.len() - incomplete - cleaned.len();

    tracing::info!(
        "Cleaned {} rows: dropped {} incomplete, {} duplicate",
        cleaned.len(),
        incomplete,
        duplicates
    );
    Some(cleaned)
}
