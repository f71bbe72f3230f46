//! Error types for annotator.

use std::path::PathBuf;

/// Result type alias for annotator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in annotator operations.
///
/// Every variant is recoverable: the [`DatasetStore`](crate::DatasetStore)
/// stays usable after any of them is reported.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow error while building the tabular export.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line of JSON Lines input could not be parsed as a JSON object.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the input text.
        line: usize,
        /// Description of the failure.
        message: String,
    },

    /// A record-level operation was attempted with zero records loaded.
    #[error("Dataset is empty, load a file first")]
    EmptyDataset,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// An annotator-supplied value could not be coerced for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// The field the value was meant for.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// A REPL command could not be understood.
    #[error("Command error: {message}")]
    Command {
        /// Description of the command error.
        message: String,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create an I/O error without path context.
    pub fn io_no_path(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }

    /// Create a parse error for the given 1-based input line.
    pub fn parse_line(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a command error.
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Line number of a parse error, if this is one.
    #[must_use]
    pub fn parse_error_line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io(io_err, "/path/to/file.jsonl");
        assert!(err.to_string().contains("/path/to/file.jsonl"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_io_error_without_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io_no_path(io_err);
        assert!(err.to_string().contains("None"));
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = Error::parse_line(2, "key must be a string");
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("key must be a string"));
        assert_eq!(err.parse_error_line(), Some(2));
    }

    #[test]
    fn test_parse_error_line_absent_for_other_variants() {
        assert_eq!(Error::EmptyDataset.parse_error_line(), None);
    }

    #[test]
    fn test_empty_dataset() {
        let err = Error::EmptyDataset;
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_invalid_config() {
        let err = Error::invalid_config("reasoning start marker is empty");
        assert!(err.to_string().contains("reasoning start marker is empty"));
    }

    #[test]
    fn test_invalid_value() {
        let err = Error::invalid_value("verification", "must be a non-negative integer");
        let msg = err.to_string();
        assert!(msg.contains("verification"));
        assert!(msg.contains("non-negative"));
    }

    #[test]
    fn test_command_error() {
        let err = Error::command("Unknown command: 'frob'");
        assert!(err.to_string().contains("frob"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
