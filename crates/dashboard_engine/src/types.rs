use std::fmt;

use dashboard_core::ActionFailure;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Network,
    /// Non-2xx status without a decodable `{success, error}` body.
    HttpStatus(u16),
    Decode,
    /// `success: false`, with the server's error text when it sent one.
    Rejected(Option<String>),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Rejected(Some(error)) => write!(f, "rejected: {error}"),
            FailureKind::Rejected(None) => write!(f, "rejected"),
        }
    }
}

impl From<ApiError> for ActionFailure {
    fn from(err: ApiError) -> Self {
        match err.kind {
            FailureKind::Rejected(error) => ActionFailure::Rejected { error },
            FailureKind::HttpStatus(_) => ActionFailure::Rejected { error: None },
            FailureKind::InvalidUrl
            | FailureKind::Timeout
            | FailureKind::Network
            | FailureKind::Decode => ActionFailure::Network(err.to_string()),
        }
    }
}

/// `{success, error?}` envelope of the mutating endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BatchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub success_count: u32,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub total: Option<u32>,
}
