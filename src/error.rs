//! Error types for the job pool.

/// Result type alias for job pool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or running a pool.
///
/// Submission failures are not errors: `submit` returns `false` when the
/// pool is no longer accepting work.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Pool lifecycle error (e.g. worker thread spawn failure)
    #[error("pool error: {0}")]
    Pool(String),

    /// Diagnostics export error
    #[cfg(feature = "telemetry")]
    #[error("export error: {0}")]
    Export(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a pool error
    pub fn pool<S: Into<String>>(msg: S) -> Self {
        Error::Pool(msg.into())
    }

    /// Create an export error
    #[cfg(feature = "telemetry")]
    pub fn export<S: Into<String>>(msg: S) -> Self {
        Error::Export(msg.into())
    }
}
