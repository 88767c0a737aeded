//! Error types for the extraction pipeline.

use crate::openai::OpenAiError;

/// Why a single URL contributed no rows.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("URL has no host")]
    MissingHost,
    #[error("fetch failed: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("page returned HTTP {0}")]
    Status(u16),
    #[error(transparent)]
    Model(#[from] OpenAiError),
    #[error("model response is not a schedule array: {0}")]
    Decode(String),
}

/// Run-level outcomes that leave the table unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("Please paste at least one valid schedule URL.")]
    NoInput,
    #[error("No data extracted from any URL.")]
    NoRows { skipped: usize },
}
