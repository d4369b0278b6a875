use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("catalog request to {source_name} timed out after {timeout:?}")]
    TimedOut {
        source_name: String,
        timeout: Duration,
    },
    #[error("catalog request to {source_name} failed: {source:#}")]
    Source {
        source_name: String,
        source: anyhow::Error,
    },
    #[error("a catalog load is already in progress")]
    InFlight,
    #[error("catalog is already loaded")]
    AlreadyLoaded,
}
