//! Bar records as they move through a run.

use chrono::{DateTime, NaiveDateTime, Timelike};
use polygon_api::types::AggregateBar;
use serde::{Deserialize, Serialize};

/// Timestamp layout used for text columns and JSON output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A bar as extracted from the provider. Any field but the ticker may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedBar {
    pub ticker: String,
    pub timestamp: Option<NaiveDateTime>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

impl FetchedBar {
    /// Normalizes one provider bar for `ticker`.
    ///
    /// The epoch-millisecond timestamp becomes a naive UTC datetime truncated to
    /// whole seconds. Volume is rounded to the nearest integer.
    pub fn from_aggregate(ticker: &str, raw: &AggregateBar) -> Self {
        Self {
            ticker: ticker.to_string(),
            timestamp: raw.timestamp_ms.and_then(epoch_millis_to_naive),
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume.map(|v| v.round() as i64),
        }
    }

    /// The fully-populated [`Bar`], or `None` if any field is missing.
    pub fn complete(&self) -> Option<Bar> {
        Some(Bar {
            ticker: self.ticker.clone(),
            timestamp: self.timestamp?,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume?,
        })
    }
}

/// One complete OHLCV observation, ready to append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ticker: String,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// Composite identity used for in-batch deduplication.
    pub fn key(&self) -> (&str, NaiveDateTime) {
        (self.ticker.as_str(), self.timestamp)
    }
}

fn epoch_millis_to_naive(ms: i64) -> Option<NaiveDateTime> {
    let dt = DateTime::from_timestamp_millis(ms)?.naive_utc();
    dt.with_nanosecond(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw() -> AggregateBar {
        AggregateBar {
            timestamp_ms: Some(1_760_707_800_000),
            open: Some(181.05),
            high: Some(181.6),
            low: Some(180.91),
            close: Some(181.42),
            volume: Some(412_873.0),
        }
    }

    #[test]
    fn epoch_millis_converted_to_naive_utc() {
        let bar = FetchedBar::from_aggregate("NVDA", &raw());
        let expected = NaiveDate::from_ymd_opt(2025, 10, 17)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap();
        assert_eq!(bar.timestamp, Some(expected));
        assert_eq!(
            bar.timestamp.unwrap().format(TIMESTAMP_FORMAT).to_string(),
            "2025-10-17T13:30:00"
        );
    }

    #[test]
    fn sub_second_part_truncated() {
        let mut r = raw();
        r.timestamp_ms = Some(1_760_707_800_999);
        let bar = FetchedBar::from_aggregate("NVDA", &r);
        assert_eq!(bar.timestamp.unwrap().nanosecond(), 0);
        assert_eq!(bar.timestamp.unwrap().second(), 0);
    }

    #[test]
    fn volume_rounded_and_sign_kept() {
        let mut r = raw();
        r.volume = Some(1234.6);
        assert_eq!(FetchedBar::from_aggregate("NVDA", &r).volume, Some(1235));

        r.volume = Some(-1.0);
        let fetched = FetchedBar::from_aggregate("NVDA", &r);
        assert_eq!(fetched.volume, Some(-1));
        assert_eq!(fetched.complete().map(|b| b.volume), Some(-1));

        r.volume = None;
        assert_eq!(FetchedBar::from_aggregate("NVDA", &r).volume, None);
    }

    #[test]
    fn complete_requires_every_field() {
        let full = FetchedBar::from_aggregate("NVDA", &raw());
        let bar = full.complete().unwrap();
        assert_eq!(bar.ticker, "NVDA");
        assert_eq!(bar.close, 181.42);
        assert_eq!(bar.volume, 412_873);

        let mut missing_close = full.clone();
        missing_close.close = None;
        assert!(missing_close.complete().is_none());

        let mut missing_ts = full;
        missing_ts.timestamp = None;
        assert!(missing_ts.complete().is_none());
    }

    #[test]
    fn complete_keeps_values_unchanged() {
        let fetched = FetchedBar::from_aggregate("MSFT", &raw());
        let bar = fetched.complete().unwrap();
        assert_eq!(Some(bar.timestamp), fetched.timestamp);
        assert_eq!(Some(bar.open), fetched.open);
        assert_eq!(Some(bar.high), fetched.high);
        assert_eq!(Some(bar.low), fetched.low);
        assert_eq!(Some(bar.volume), fetched.volume);
    }
}
