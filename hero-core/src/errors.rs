use hero_types::{Action, FailureKind, ValidationReason};
use std::time::Duration;

pub type HeroResult<T> = Result<T, HeroError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeroError {
    #[error("{0}")]
    Validation(ValidationReason),
    #[error("{message}")]
    Remote { action: Action, message: String },
    #[error("Could not reach the server during {action}: {message}")]
    Transport { action: Action, message: String },
    #[error("The server did not answer {action} within {}s", .after.as_secs())]
    Timeout { action: Action, after: Duration },
    #[error("Unexpected response to {action}: {message}")]
    Protocol { action: Action, message: String },
    #[error("Request for {action} is too large ({length} > {limit} characters)")]
    PayloadTooLarge {
        action: Action,
        length: usize,
        limit: usize,
    },
    #[error("{action} was cancelled")]
    Cancelled { action: Action },
    #[error("The quiz pool is empty")]
    EmptyPool,
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HeroError {
    pub fn validation(reason: ValidationReason) -> Self {
        HeroError::Validation(reason)
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            HeroError::Validation(_) | HeroError::EmptyPool => FailureKind::Validation,
            HeroError::Remote { .. } => FailureKind::Remote,
            HeroError::Timeout { .. } => FailureKind::Timeout,
            HeroError::Transport { .. }
            | HeroError::Protocol { .. }
            | HeroError::PayloadTooLarge { .. }
            | HeroError::Cancelled { .. }
            | HeroError::Config(_) => FailureKind::Transport,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == FailureKind::Validation
    }

    /// Text shown to the player. Remote messages pass through verbatim.
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::Validation | FailureKind::Remote => self.to_string(),
            FailureKind::Timeout => format!(
                "{} Please try again in a moment.",
                self
            ),
            FailureKind::Transport => format!(
                "{} Check the internet connection, turn off ad or script blockers for this site, and try again.",
                self
            ),
        }
    }
}

impl From<ValidationReason> for HeroError {
    fn from(reason: ValidationReason) -> Self {
        HeroError::Validation(reason)
    }
}
