//! Response types for the aggregates endpoint.
//!
//! Every field is optional: Polygon omits `results` entirely when a window has no
//! bars, and individual bars occasionally arrive with fields missing or null.
//! A bar field holding a value of the wrong JSON type reads as `None` rather
//! than failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level body of `GET /v2/aggs/ticker/{ticker}/range/...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatesResponse {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub adjusted: Option<bool>,
    #[serde(default)]
    pub query_count: Option<i64>,
    #[serde(default)]
    pub results_count: Option<i64>,
    #[serde(default, rename = "request_id")]
    pub request_id: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<AggregateBar>>,
}

impl AggregatesResponse {
    /// The bars in the response, or an empty slice when `results` is absent or null.
    pub fn bars(&self) -> &[AggregateBar] {
        self.results.as_deref().unwrap_or(&[])
    }
}

/// One OHLCV bar as Polygon serializes it (single-letter keys).
///
/// Keys other than `t/o/h/l/c/v` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateBar {
    /// Start of the bar window, Unix epoch milliseconds.
    #[serde(rename = "t", default, deserialize_with = "lenient")]
    pub timestamp_ms: Option<i64>,
    #[serde(rename = "o", default, deserialize_with = "lenient")]
    pub open: Option<f64>,
    #[serde(rename = "h", default, deserialize_with = "lenient")]
    pub high: Option<f64>,
    #[serde(rename = "l", default, deserialize_with = "lenient")]
    pub low: Option<f64>,
    #[serde(rename = "c", default, deserialize_with = "lenient")]
    pub close: Option<f64>,
    /// Polygon serializes volume as a JSON number that may carry a fraction.
    #[serde(rename = "v", default, deserialize_with = "lenient")]
    pub volume: Option<f64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}
