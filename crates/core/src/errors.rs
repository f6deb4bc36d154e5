use thiserror::Error;

/// Unified error type for the entire brent-insight-core library.
///
/// Only genuinely invalid input ends up here. Short series and missing
/// matches are ordinary outcomes and are returned as `Option`, empty
/// vectors or [`crate::models::analytics::ImpactAnalysis`] variants instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ── Data ────────────────────────────────────────────────────────
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("CSV error: {0}")]
    Csv(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        CoreError::InvalidConfiguration(message.into())
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::Csv(e.to_string())
    }
}

impl From<chrono::ParseError> for CoreError {
    fn from(e: chrono::ParseError) -> Self {
        CoreError::InvalidDate(e.to_string())
    }
}
