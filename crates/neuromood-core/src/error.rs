//! Error types for the signal pipeline
use thiserror::Error;

/// Core pipeline errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// Band-pass or notch parameters outside the valid range
    #[error("Invalid filter parameter: {0}")]
    InvalidFilterParameter(String),

    /// Zero-length sample sequence handed to filtering or analysis
    #[error("Empty signal: at least one sample is required")]
    EmptySignal,

    /// NaN or infinite sample value
    #[error("Non-finite sample at index {index}")]
    NonFiniteSample {
        /// Position of the first offending sample
        index: usize,
    },

    /// Synthesis parameters that cannot produce a signal
    #[error("Invalid signal parameter: {0}")]
    InvalidSignalParameter(String),

    /// I/O error while reading or writing settings
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON deserialization error
    #[error("RON error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// Settings file extension is not recognised
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// Settings file exceeds the size cap
    #[error("Settings file too large: {size} bytes (limit {limit})")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
        /// Maximum accepted size in bytes
        limit: u64,
    },
}

impl CoreError {
    /// Creates an invalid filter parameter error.
    pub fn filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilterParameter(msg.into())
    }

    /// Creates an invalid signal parameter error.
    pub fn signal(msg: impl Into<String>) -> Self {
        Self::InvalidSignalParameter(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::filter("low cutoff 0 Hz must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid filter parameter: low cutoff 0 Hz must be positive"
        );
    }

    #[test]
    fn test_file_too_large() {
        let err = CoreError::FileTooLarge {
            size: 2048,
            limit: 1024,
        };
        let err_str = err.to_string();
        assert!(err_str.contains("2048"));
        assert!(err_str.contains("1024"));
    }
}
