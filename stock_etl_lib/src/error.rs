//! Error types for the library layer.

use crate::config::ConfigError;
use crate::schedule::Stage;
use crate::store::DbError;

/// Errors that fail a stage, a run, or startup.
///
/// Per-ticker fetch failures never appear here; they are reported through
/// [`crate::fetch::TickerOutcome`] instead.
#[derive(thiserror::Error, Debug)]
pub enum EtlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("API client error: {0}")]
    Api(#[from] polygon_api::Error),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{stage} stage failed after {attempts} attempt(s): {source}")]
    StageFailed {
        stage: Stage,
        attempts: u32,
        #[source]
        source: Box<EtlError>,
    },
}
