//! Error types for calls against the remote fax API.

use thiserror::Error;

/// Errors that can occur when talking to the ICT API.
#[derive(Debug, Error)]
pub enum IctError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-200 response.
    #[error("{operation} failed with status code: {status}")]
    Status { operation: &'static str, status: u16 },

    /// The configured hostname is not an absolute URL.
    #[error("invalid host: {0}")]
    InvalidHost(String),

    /// A plain-text ID response that had to be numeric.
    #[error("invalid {what} id: {body:?}")]
    InvalidId { what: &'static str, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IctError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            IctError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
