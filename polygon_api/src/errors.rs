//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configured base URL cannot be extended with a request path.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// The HTTP client could not be built or the request never completed.
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The body was not a valid aggregates response.
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
}
