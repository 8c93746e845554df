use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("IO error at {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot encode value of type {type_name} at {path}: {reason}")]
    EncodingError {
        path: String,
        type_name: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Filesystem,
    Encoding,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl WriterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError { .. } => ErrorCategory::Filesystem,
            Self::EncodingError { .. } | Self::SerializationError(_) => ErrorCategory::Encoding,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Encoding => ErrorSeverity::High,
            ErrorCategory::Filesystem => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::IoError { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => format!(
                    "Create the output directory before writing (missing: {})",
                    path.parent().unwrap_or(path).display()
                ),
                std::io::ErrorKind::PermissionDenied => {
                    format!("Check write permissions on {}", path.display())
                }
                _ => "Check that the output location is a writable directory".to_string(),
            },
            Self::EncodingError { type_name, .. } => format!(
                "Convert the {} value to a number, string, list or map, or install an encoder that handles it",
                type_name
            ),
            Self::SerializationError(_) => {
                "Make sure the input is valid JSON and contains only serializable values".to_string()
            }
            Self::ConfigError { .. } | Self::ValidationError { .. } => {
                "Review the writer configuration file".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Filesystem => format!("Could not write the output file: {}", self),
            ErrorCategory::Encoding => format!("The data could not be encoded as JSON: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, WriterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_suggestion_names_parent() {
        let err = WriterError::io(
            "/no/such/dir/out.json",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.category(), ErrorCategory::Filesystem);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("/no/such/dir"));
    }

    #[test]
    fn test_encoding_error_display() {
        let err = WriterError::EncodingError {
            path: "$.b[2]".to_string(),
            type_name: "complex128".to_string(),
            reason: "not JSON serializable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot encode value of type complex128 at $.b[2]: not JSON serializable"
        );
        assert_eq!(err.category(), ErrorCategory::Encoding);
    }
}
