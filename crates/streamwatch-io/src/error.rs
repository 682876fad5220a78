use thiserror::Error;

/// Errors from sinks and readers.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed sample on line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("sink already finished")]
    SinkFinished,
}

/// Convenience type alias for sink and reader results.
pub type IoResult<T> = Result<T, IoError>;
