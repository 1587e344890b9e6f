//! Identity-service failures and their classification into display text.
//!
//! ERROR HANDLING
//! ==============
//! Callers of `login`/`signup`/`verify` receive the original [`IdentityError`]
//! so they can branch on it (field highlighting, retry buttons). The session
//! itself only keeps the string produced by [`classify`].

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::ErrorBody;

/// Errors produced by identity-service calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The service rejected the request with a structured 4xx error.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service failed with a 5xx status.
    #[error("identity service error: status {status}")]
    Server { status: u16 },

    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Decode(String),
}

impl IdentityError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "E_REJECTED",
            Self::Server { .. } => "E_SERVER",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
        }
    }

    /// HTTP status, when the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::Server { status } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Build the error for a non-success HTTP response from its raw body.
    ///
    /// 4xx responses with a readable `message`/`error` field become
    /// [`IdentityError::Rejected`]; anything else is unstructured.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        if !(400..500).contains(&status) {
            return Self::Server { status };
        }
        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        match parsed.display_message() {
            Some(message) => Self::Rejected { status, message: message.to_owned() },
            None => Self::Decode(format!("status {status} without error message")),
        }
    }
}

/// Failure taxonomy exposed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// User-actionable; message is safe to display verbatim.
    Validation,
    /// Anything not recognized as a structured service error.
    Unknown,
}

/// A failure normalized to a kind plus display-ready text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Classify `err`, using `fallback` as the text for unknown failures.
pub fn classify(err: &IdentityError, fallback: &str) -> ClassifiedFailure {
    match err {
        IdentityError::Rejected { message, .. } => {
            ClassifiedFailure { kind: FailureKind::Validation, message: message.clone() }
        }
        IdentityError::Server { .. } | IdentityError::Transport(_) | IdentityError::Decode(_) => {
            ClassifiedFailure { kind: FailureKind::Unknown, message: fallback.to_owned() }
        }
    }
}
