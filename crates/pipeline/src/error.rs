//! Pipeline error types.

/// Errors produced by the ingestion pipeline.
///
/// Every variant is machine-distinguishable so the CLI/SDK layer can
/// format or branch on the cause without string matching.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Input shape meant for the other runtime was handed to a discoverer.
    #[error("wrong environment: {0}")]
    Environment(String),

    /// Input does not match any recognized shape.
    #[error("invalid deploy input: {0}")]
    InvalidInput(String),

    /// Zero candidate files after discovery.
    #[error("no files to deploy")]
    NoFiles,

    #[error("too many files: {count} exceeds the limit of {max}")]
    TooManyFiles { count: usize, max: u64 },

    #[error("file too large: {path} is {size} bytes, limit is {max}")]
    FileTooLarge { path: String, size: u64, max: u64 },

    #[error("total size {total} bytes exceeds the limit of {max}")]
    TotalSizeExceeded { total: u64, max: u64 },

    #[error("unsafe file name: {0}")]
    UnsafeName(String),

    #[error("blocked file extension: {0}")]
    BlockedExtension(String),

    #[error("unsafe path: {0}")]
    UnsafePath(String),

    /// The underlying byte source could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    /// Platform limits were accessed before initialization.
    #[error("platform limits not initialized")]
    LimitsNotInitialized,
}
