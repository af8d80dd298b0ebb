use thiserror::Error;

/// The reason why an operation against the backend failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The token is invalid or expired.
    #[error("Not authorized")]
    Unauthorized,

    /// The request did not reach the backend
    /// or the response could not be read.
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Request failed with status {status}")]
    Backend {
        status: u16,
        message: Option<String>,
    },

    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl Failure {
    #[must_use]
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        Self::Backend { status, message }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// The message to show to the user.
    ///
    /// Messages reported by the backend or by validation
    /// are shown as they are, everything else falls back
    /// to the given generic message.
    #[must_use]
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            Self::Backend {
                message: Some(msg), ..
            } => msg.clone(),
            Self::Validation(msg) => msg.clone(),
            Self::Unauthorized | Self::Transport(_) | Self::Backend { message: None, .. } => {
                generic.to_string()
            }
        }
    }
}
