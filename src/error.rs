//! Unified client error model.
//! The API client normalizes every failed call into one of these variants so
//! page controllers never see raw transport faults.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Message synthesized when the transport itself failed (no response reached us).
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiError {
    /// A response was obtained but carried a non-success status. `message` is
    /// the server's human-readable rejection reason, when the body had one.
    Status { status: u16, message: Option<String> },
    /// No response was obtained (connect failure, timeout, bad payload).
    Transport { message: String },
}

impl ApiError {
    pub fn status(code: u16, message: Option<String>) -> Self {
        ApiError::Status { status: code, message }
    }

    pub fn transport() -> Self {
        ApiError::Transport { message: GENERIC_ERROR_MESSAGE.to_string() }
    }

    /// Server message if present, otherwise the generic synthesized one.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Status { message, .. } => message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE),
            ApiError::Transport { message } => message.as_str(),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { .. } => None,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Status { status, .. } => write!(f, "HTTP {}: {}", status, self.message()),
            ApiError::Transport { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
