use super::snapshot::SnapshotError;

/// Errors that can occur while composing or saving a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A chart could not be captured; no document was produced
    #[error("Snapshot failed: {0}")]
    Snapshot(#[from] SnapshotError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error serializing the summary
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Error from the ZIP container library
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Temporary file could not be moved into place
    #[error("Failed to persist {path}: {source}")]
    Persist {
        /// Destination path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Output location is unusable
    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    /// Report options are out of range
    #[error("Invalid report options: {0}")]
    InvalidOptions(String),
}
