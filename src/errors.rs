//! Custom error types for feature extraction

use std::fmt;
use std::io;

/// Feature extraction error types
#[derive(Debug)]
pub enum FeatureError {
    /// I/O error
    IoError(io::Error),
    /// JSON encoding or decoding error
    JsonError(serde_json::Error),
    /// Configuration file could not be parsed
    ConfigError(String),
    /// A source image is missing or could not be decoded
    ImageOpen { path: String, reason: String },
    /// A class referenced under `points` is absent from `classes`
    InconsistentPointSet(String),
    /// Point document does not have the expected structure
    MalformedPoints(String),
    /// Vector package does not have the expected structure
    MalformedPackage(String),
    /// Extractor name not recognized
    UnknownExtractor(String),
    /// Extractor parameter has the wrong type or value
    InvalidParameter(String),
    /// Image layers cannot be stacked
    InvalidStack(String),
    /// Stack was padded for a different extractor
    StackMismatch { expected: usize, actual: usize },
    /// Pixel coordinate outside the un-padded image
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },
    /// The running task was cancelled
    Cancelled,
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::IoError(e) => write!(f, "I/O error: {}", e),
            FeatureError::JsonError(e) => write!(f, "JSON error: {}", e),
            FeatureError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            FeatureError::ImageOpen { path, reason } => write!(f, "{} could not be opened: {}", path, reason),
            FeatureError::InconsistentPointSet(class) => write!(f, "Class '{}' is used by points but not listed in classes", class),
            FeatureError::MalformedPoints(msg) => write!(f, "Malformed point file: {}", msg),
            FeatureError::MalformedPackage(msg) => write!(f, "Malformed vector package: {}", msg),
            FeatureError::UnknownExtractor(name) => write!(f, "Unknown extractor: '{}'", name),
            FeatureError::InvalidParameter(msg) => write!(f, "Invalid extractor parameter: {}", msg),
            FeatureError::InvalidStack(msg) => write!(f, "Invalid image stack: {}", msg),
            FeatureError::StackMismatch { expected, actual } =>
                write!(f, "Stack padded by {} but extractor needs {}", actual, expected),
            FeatureError::OutOfBounds { x, y, width, height } =>
                write!(f, "Pixel ({}, {}) is outside the {}x{} image", x, y, width, height),
            FeatureError::Cancelled => write!(f, "Task cancelled"),
            FeatureError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for FeatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeatureError::IoError(e) => Some(e),
            FeatureError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FeatureError {
    fn from(error: io::Error) -> Self {
        FeatureError::IoError(error)
    }
}

impl From<serde_json::Error> for FeatureError {
    fn from(error: serde_json::Error) -> Self {
        FeatureError::JsonError(error)
    }
}

/// Result type for feature extraction operations
pub type FeatureResult<T> = Result<T, FeatureError>;

impl From<String> for FeatureError {
    fn from(msg: String) -> Self {
        FeatureError::GenericError(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_open_message_names_file() {
        let err = FeatureError::ImageOpen {
            path: "missing.png".to_string(),
            reason: "No such file".to_string(),
        };
        assert!(err.to_string().starts_with("missing.png could not be opened"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: FeatureError = io_err.into();
        assert!(matches!(err, FeatureError::IoError(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
