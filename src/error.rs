use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by remote file-manager operations.
#[derive(Error, Debug)]
pub enum FmError {
    /// The connection could not be established or was interrupted.
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("HTTP {status} {reason}: {body}")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    /// The server answered 2xx but the payload does not report success.
    #[error("{operation} failed: {reason} (payload: {payload})")]
    Application {
        operation: &'static str,
        reason: String,
        payload: serde_json::Value,
    },

    #[error("Failed to read local file '{path}': {source}")]
    LocalFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Upload request contains no files")]
    NoFiles,
}

/// Coarse failure class, used to tell transport problems apart from
/// rejections by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Http,
    Application,
    Local,
}

impl FmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FmError::Transport { .. } => ErrorCategory::Transport,
            FmError::HttpStatus { .. } => ErrorCategory::Http,
            FmError::Application { .. } => ErrorCategory::Application,
            FmError::LocalFile { .. } | FmError::NoFiles => ErrorCategory::Local,
        }
    }
}

impl From<reqwest::Error> for FmError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        FmError::Transport { message }
    }
}
