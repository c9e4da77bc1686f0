//! Error types for profile loading and configuration
//!
//! Detection itself never fails: every input string yields a
//! [`DetectionResult`](crate::DetectionResult). Only building a
//! [`ProfileStore`](crate::ProfileStore) or a [`DetectorConfig`](crate::DetectorConfig)
//! can return an error.

use std::process::ExitCode;

use thiserror::Error;

/// Errors raised while constructing the detector
#[derive(Error, Debug)]
pub enum LangSniffError {
    /// The profile path does not exist or is neither a file nor a directory
    #[error("Profile source not found: {path}")]
    SourceNotFound { path: String },

    /// The source exists but yielded no usable profile
    #[error("Profile source is empty: {path}")]
    SourceEmpty { path: String },

    /// The source could not be read as a table of profiles
    #[error("Profile source is malformed: {path}: {message}")]
    SourceMalformed { path: String, message: String },

    /// Calibration or limit values are out of range, or the config file is unreadable
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using LangSniffError
pub type Result<T> = std::result::Result<T, LangSniffError>;

impl LangSniffError {
    pub(crate) fn malformed(path: impl Into<String>, message: impl ToString) -> Self {
        Self::SourceMalformed {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::SourceNotFound { .. } => ExitCode::from(2),
            Self::SourceEmpty { .. } | Self::SourceMalformed { .. } => ExitCode::from(3),
            Self::InvalidConfig { .. } => ExitCode::from(4),
            Self::Io(_) | Self::Json(_) => ExitCode::from(5),
        }
    }
}
