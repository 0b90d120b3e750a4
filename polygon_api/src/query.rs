//! Query builder for the `/v2/aggs/ticker/{ticker}/range/...` endpoint.

use chrono::NaiveDate;
use url::Url;

/// Upper bound Polygon accepts for `limit` on a single aggregates request.
pub const DEFAULT_RESULT_LIMIT: u32 = 50_000;

/// One aggregates request: a ticker and an inclusive date range.
///
/// Always asks for split-adjusted 1-minute bars, oldest first, capped at
/// `limit` (default [`DEFAULT_RESULT_LIMIT`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatesQuery {
    pub ticker: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub limit: u32,
}

impl AggregatesQuery {
    pub fn new(ticker: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            from,
            to,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Path segments appended to the base URL, e.g.
    /// `v2/aggs/ticker/NVDA/range/1/minute/2025-10-17/2025-10-20`.
    pub fn path_segments(&self) -> Vec<String> {
        vec![
            "v2".to_string(),
            "aggs".to_string(),
            "ticker".to_string(),
            self.ticker.clone(),
            "range".to_string(),
            "1".to_string(),
            "minute".to_string(),
            self.from.format("%Y-%m-%d").to_string(),
            self.to.format("%Y-%m-%d").to_string(),
        ]
    }

    /// Appends the query-string parameters (everything except the API key).
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("adjusted", "true")
            .append_pair("sort", "asc")
            .append_pair("limit", &self.limit.to_string());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_to_result_cap() {
        let q = AggregatesQuery::new("NVDA", date(2025, 10, 17), date(2025, 10, 20));
        assert_eq!(q.limit, 50_000);
    }

    #[test]
    fn path_segments_format_dates() {
        let q = AggregatesQuery::new("TSLA", date(2025, 1, 2), date(2025, 3, 4));
        assert_eq!(
            q.path_segments().join("/"),
            "v2/aggs/ticker/TSLA/range/1/minute/2025-01-02/2025-03-04"
        );
    }

    #[test]
    fn add_to_url_appends_params() {
        let base = Url::parse("https://api.polygon.io/v2/aggs").unwrap();
        let q = AggregatesQuery::new("MSFT", date(2025, 10, 17), date(2025, 10, 17)).with_limit(10);
        let url = q.add_to_url(&base);
        assert_eq!(url.query(), Some("adjusted=true&sort=asc&limit=10"));
    }
}
