//! Error types for the hair simulation core

use thiserror::Error;

/// Main error type for the simulation core
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected configuration: point count below 3, non-positive base
    /// length, zero density. Raised before any buffer is touched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Zero-triangle scalp or empty guide set. Non-fatal for the host:
    /// the previous strand buffer stays valid.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// GPU buffer allocation was skipped or failed (e.g. zero points).
    /// The object stays alive but renders nothing until the next rebuild.
    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
