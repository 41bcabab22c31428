//! Error types for docnorm operations.
//!
//! Every extractor call either returns a complete sequence of segments or one
//! of these errors. Nothing here is retried; the error code lets callers tell
//! configuration problems apart from collaborator and input failures.

use thiserror::Error;

/// Result type alias for docnorm operations.
pub type DocnormResult<T> = Result<T, DocnormError>;

/// Main error type for all docnorm operations.
#[derive(Error, Debug)]
pub enum DocnormError {
    /// Required configuration (credentials, endpoints) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Options passed to an extractor could not be interpreted.
    #[error("Invalid options for {extractor}: {message}")]
    InvalidOptions { extractor: String, message: String },

    /// The transcription collaborator failed.
    #[error("Transcription error: {message}")]
    Transcription {
        message: String,
        /// Index of the audio window that failed, when chunking.
        window: Option<usize>,
    },

    /// The document-analysis collaborator failed.
    #[error("Document analysis error: {message}")]
    Analysis { message: String },

    /// Audio could not be decoded or re-encoded.
    #[error("Audio decode error: {message}")]
    Decode { message: String },

    /// A document parser rejected its input.
    #[error("{format} parse error: {message}")]
    Parse { format: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    CfgMissingCredentials,
    OptInvalid,
    TrnFailed,
    AnaFailed,
    DecFailed,
    ParseFailed,
    Io,
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgMissingCredentials => "CFG_001",
            ErrorCode::OptInvalid => "OPT_001",
            ErrorCode::TrnFailed => "TRN_001",
            ErrorCode::AnaFailed => "ANA_001",
            ErrorCode::DecFailed => "DEC_001",
            ErrorCode::ParseFailed => "PARSE_001",
            ErrorCode::Io => "IO_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl DocnormError {
    /// Create an invalid-options error.
    pub fn invalid_options(extractor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            extractor: extractor.into(),
            message: message.into(),
        }
    }

    /// Create a transcription error not tied to a window.
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::Transcription {
            message: message.into(),
            window: None,
        }
    }

    /// Create a document-analysis error.
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Create an audio decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a parse error for the given format.
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Attach the failing window index to a transcription error.
    pub fn in_window(self, index: usize) -> Self {
        match self {
            Self::Transcription { message, .. } => Self::Transcription {
                message,
                window: Some(index),
            },
            other => other,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) => ErrorCode::CfgMissingCredentials,
            Self::InvalidOptions { .. } => ErrorCode::OptInvalid,
            Self::Transcription { .. } => ErrorCode::TrnFailed,
            Self::Analysis { .. } => ErrorCode::AnaFailed,
            Self::Decode { .. } => ErrorCode::DecFailed,
            Self::Parse { .. } => ErrorCode::ParseFailed,
            Self::Io(_) => ErrorCode::Io,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error was raised before any external call was attempted.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = DocnormError::Configuration("KEY is not set".to_string());
        assert_eq!(err.code(), ErrorCode::CfgMissingCredentials);
        assert!(err.is_configuration());
        assert!(err.to_string().contains("KEY is not set"));
    }

    #[test]
    fn test_in_window_tags_transcription_errors_only() {
        let err = DocnormError::transcription("quota").in_window(3);
        assert!(matches!(
            err,
            DocnormError::Transcription {
                window: Some(3),
                ..
            }
        ));

        let err = DocnormError::decode("bad frame").in_window(3);
        assert!(matches!(err, DocnormError::Decode { .. }));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::CfgMissingCredentials.as_str(), "CFG_001");
        assert_eq!(ErrorCode::ParseFailed.as_str(), "PARSE_001");
    }

    #[test]
    fn test_parse_error_display() {
        let err = DocnormError::parse("xlsx", "not a zip archive");
        assert_eq!(err.to_string(), "xlsx parse error: not a zip archive");
    }
}
