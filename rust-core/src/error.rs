//! Error types for the fall monitoring engine.

use std::path::PathBuf;

use crate::types::LandmarkId;

/// Errors raised by the monitoring engine and its input collaborators.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The pose estimator returned a landmark set without a point the
    /// heuristics depend on.
    #[error("landmark set is missing required point {id:?}")]
    MissingLandmark {
        /// The absent point.
        id: LandmarkId,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration value for `{field}`: {reason}")]
    Config {
        field: &'static str,
        reason: String,
    },

    /// A file could not be opened or read.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A landmark stream line could not be decoded.
    #[error("malformed landmark frame at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A stream produced no frames, so it cannot be replayed.
    #[error("landmark stream `{name}` contains no frames")]
    EmptyStream { name: String },
}

impl MonitorError {
    /// Convenience constructor for [`MonitorError::Config`].
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        MonitorError::Config {
            field,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`MonitorError::Io`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MonitorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MonitorError::MissingLandmark {
            id: LandmarkId::RightHip,
        };
        assert_eq!(err.to_string(), "landmark set is missing required point RightHip");

        let err = MonitorError::config("history_len", "must be at least 2");
        assert!(err.to_string().contains("history_len"));

        let err = MonitorError::Parse {
            line: 7,
            reason: "expected value".into(),
        };
        assert!(err.to_string().contains("line 7"));
    }
}
