//! Load stage: append the cleaned batch to the destination table.

use crate::bar::Bar;
use crate::store::{BarStore, DbError, StoreConnector, TABLE_NAME};

/// Appends `batch` through a fresh connection from `connector`.
///
/// An absent or empty batch short-circuits before any connection is opened.
/// Returns the number of rows loaded.
pub async fn load<C: StoreConnector>(connector: &C, batch: Option<&[Bar]>) -> Result<usize, DbError> {
    let bars = match batch {
        Some(bars) if !bars.is_empty() => bars,
        _ => {
            tracing::info!("No transformed data to load.");
            return Ok(0);
        }
    };

    let mut store = connector.connect().await?;
    let loaded = store.append(bars).await?;
    tracing::info!(
        "Loaded {} rows into {} table ({})",
        loaded,
        TABLE_NAME,
        connector.describe()
    );
    Ok(loaded)
}
