//! Error type shared by the benchmark and trace halves of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProfilerError>;

/// Everything the instrumentation layer can report back to a caller.
///
/// None of these are fatal to the instrumented program; library code
/// never panics on them.
#[derive(Debug, Error)]
pub enum ProfilerError {
    /// An aggregate (average, summary, CSV line) was requested with no samples.
    #[error("no samples recorded")]
    EmptyCollector,

    /// `record()` was called on a collector that already holds `capacity` samples.
    #[error("collector is full ({capacity} samples)")]
    CollectorFull { capacity: usize },

    /// A budgeted benchmark run ended before the collector filled up.
    #[error("benchmark incomplete: {recorded} of {capacity} runs recorded")]
    Incomplete { recorded: usize, capacity: usize },

    /// Output directory or file could not be created or written.
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("trace serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("histogram: {0}")]
    Histogram(String),
}

impl ProfilerError {
    /// Wrap an `io::Error` with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
