use thiserror::Error;

/// Why a user action or poll failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionFailure {
    /// The request could not complete, or its response was unreadable.
    #[error("network failure: {0}")]
    Network(String),
    /// The server answered `success: false`.
    #[error("server rejected request: {}", .error.as_deref().unwrap_or("no reason given"))]
    Rejected { error: Option<String> },
    /// A client-side precondition failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
}

impl ActionFailure {
    pub fn rejected(error: impl Into<String>) -> Self {
        ActionFailure::Rejected {
            error: Some(error.into()),
        }
    }

    /// Notification text for a failed action.
    ///
    /// Server-supplied error text is shown verbatim after `prefix`; a silent
    /// rejection gets "unknown error"; network failures get `network_text`.
    pub fn notice(&self, prefix: &str, network_text: &str) -> String {
        match self {
            ActionFailure::Rejected { error: Some(error) } if !error.is_empty() => {
                format!("{prefix}: {error}")
            }
            ActionFailure::Rejected { .. } => format!("{prefix}: unknown error"),
            ActionFailure::Network(_) => network_text.to_string(),
            ActionFailure::Validation(text) => text.clone(),
        }
    }
}
