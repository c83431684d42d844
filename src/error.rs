//! Client error types
//!
//! Every failure a controller can observe while talking to the backend.

use thiserror::Error;

/// Errors that can occur while fetching from or posting to the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// HTTP 403
    #[error("Access denied{}", detail_suffix(.detail))]
    Forbidden { detail: Option<String> },

    /// Any other non-2xx response
    #[error("Request rejected ({status}){}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },

    /// A decision was requested for a row that was never rendered
    #[error("Unknown pending expense: {0}")]
    UnknownRow(i64),


    /// Local session file could not be read or written
    #[error("IO error: {0}")]
    Io(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl DashError {
    /// Server-provided detail message, if the backend sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            DashError::Forbidden { detail } | DashError::Rejected { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// True when the backend answered with a structured non-2xx response
    pub fn is_http_status(&self) -> bool {
        matches!(self, DashError::Forbidden { .. } | DashError::Rejected { .. })
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        DashError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        DashError::Io(err.to_string())
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for DashError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashError::Decode(err.to_string())
        } else {
            DashError::Transport(err.to_string())
        }
    }
}

/// Result type alias for client operations
pub type DashResult<T> = Result<T, DashError>;
