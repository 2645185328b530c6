// Error types for snapshot probes and telemetry queries

use thiserror::Error;

/// Failure reported by a [`SnapshotSource`](crate::snapshot::SnapshotSource) probe.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The platform does not expose this fact.
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("probe lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Errors returned by [`TelemetryRepo`](crate::telemetry_repo::TelemetryRepo) queries.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// The blocking probe task panicked or was cancelled.
    #[error("probe task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
