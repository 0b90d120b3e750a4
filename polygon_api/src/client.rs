//! HTTP client for the Polygon aggregates API.

use serde::de::DeserializeOwned;
use url::Url;

use crate::{query::AggregatesQuery, types::AggregatesResponse, Error};

/// Production Polygon REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// HTTP client for the Polygon REST API.
///
/// Holds one pooled `reqwest::Client`. No request timeout is configured, so a
/// hung connection blocks the caller until the transport gives up.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    /// Base URL for the API, e.g. [`DEFAULT_BASE_URL`].
    base_api_url: String,
}

impl Client {
    /// Creates a client for `base_url`, normally [`DEFAULT_BASE_URL`] or a wiremock server.
    pub fn with_base_url(base_url: &str, api_key: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder().gzip(true).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_api_url: base_url.to_string(),
        })
    }

    fn get_url(&self, segments: &[String]) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::InvalidBaseUrl(self.base_api_url.clone())
        })?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base_api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self
            .http
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .header("accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            Error::ParseFailed(format!("{} | body: {}", e, truncate_body(&body)))
        })
    }

    /// Fetches the aggregate bars for one ticker and date range in a single request.
    ///
    /// Bars beyond `query.limit` are not returned and no follow-up page is requested.
    pub async fn get_aggregates(&self, query: &AggregatesQuery) -> Result<AggregatesResponse, Error> {
        let url = self.get_url(&query.path_segments())?;
        self.get(query.add_to_url(&url)).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_url_appends_segments_to_base_path() {
        let client = Client::with_base_url("http://localhost:1234/", "k").unwrap();
        let url = client
            .get_url(&["v2".to_string(), "aggs".to_string()])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/v2/aggs");
    }

    #[test]
    fn get_url_rejects_unusable_base() {
        let client = Client::with_base_url("not a url", "k").unwrap();
        let err = client.get_url(&["v2".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl(_)));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_long_bodies() {
        let long = "x".repeat(600);
        let out = truncate_body(&long);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 500 + "...[truncated]".len());
    }
}
