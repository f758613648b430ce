//! Adapter-level errors and classification.
//!
//! ```rust
//! use tchat::{AssistantError, AssistantErrorKind};
//! use tprovider::ProviderError;
//!
//! let error = AssistantError::from(ProviderError::rate_limited("slow down"));
//! assert_eq!(error.kind, AssistantErrorKind::ProviderUnavailable);
//! assert!(error.retryable);
//!
//! let rejected = AssistantError::from(ProviderError::authentication("bad key"));
//! assert_eq!(rejected.kind, AssistantErrorKind::InvalidConfig);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use tprovider::{ProviderError, ProviderErrorKind, RunStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantErrorKind {
    ProviderUnavailable,
    InvalidConfig,
    InvalidRequest,
    InvalidProvider,
    InvalidThread,
    RunFailed,
    RunExpired,
    RunCancelled,
    Timeout,
}

impl AssistantErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "provider_unavailable",
            Self::InvalidConfig => "invalid_config",
            Self::InvalidRequest => "invalid_request",
            Self::InvalidProvider => "invalid_provider",
            Self::InvalidThread => "invalid_thread",
            Self::RunFailed => "run_failed",
            Self::RunExpired => "run_expired",
            Self::RunCancelled => "run_cancelled",
            Self::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl AssistantError {
    pub fn new(kind: AssistantErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::ProviderUnavailable, message, true)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::InvalidConfig, message, false)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::InvalidRequest, message, false)
    }

    pub fn invalid_provider(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::InvalidProvider, message, false)
    }

    pub fn invalid_thread(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::InvalidThread, message, false)
    }

    pub fn run_failed(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::RunFailed, message, false)
    }

    pub fn run_expired(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::RunExpired, message, true)
    }

    pub fn run_cancelled(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::RunCancelled, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Timeout, message, true)
    }

    /// Error for a non-success terminal run state; `None` for anything else.
    pub fn for_terminal_status(status: RunStatus, run_id: &str) -> Option<Self> {
        let message = format!("run {run_id} ended with status {status}");
        match status {
            RunStatus::Failed => Some(Self::run_failed(message)),
            RunStatus::Expired => Some(Self::run_expired(message)),
            RunStatus::Cancelled => Some(Self::run_cancelled(message)),
            RunStatus::Queued
            | RunStatus::InProgress
            | RunStatus::Cancelling
            | RunStatus::Completed => None,
        }
    }
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for AssistantError {}

impl From<ProviderError> for AssistantError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Authentication | ProviderErrorKind::InvalidRequest => {
                AssistantErrorKind::InvalidConfig
            }
            ProviderErrorKind::NotFound => AssistantErrorKind::InvalidThread,
            ProviderErrorKind::RateLimited
            | ProviderErrorKind::Timeout
            | ProviderErrorKind::Transport
            | ProviderErrorKind::Unavailable
            | ProviderErrorKind::Other => AssistantErrorKind::ProviderUnavailable,
        };

        Self::new(kind, value.message, value.retryable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_adapter_taxonomy() {
        let cases = [
            (ProviderError::authentication("a"), AssistantErrorKind::InvalidConfig),
            (ProviderError::invalid_request("b"), AssistantErrorKind::InvalidConfig),
            (ProviderError::not_found("c"), AssistantErrorKind::InvalidThread),
            (ProviderError::timeout("d"), AssistantErrorKind::ProviderUnavailable),
            (ProviderError::unavailable("e"), AssistantErrorKind::ProviderUnavailable),
            (ProviderError::other("f"), AssistantErrorKind::ProviderUnavailable),
        ];

        for (source, expected) in cases {
            let retryable = source.retryable;
            let mapped = AssistantError::from(source);
            assert_eq!(mapped.kind, expected);
            assert_eq!(mapped.retryable, retryable);
        }
    }

    #[test]
    fn terminal_status_errors_carry_the_state() {
        let failed = AssistantError::for_terminal_status(RunStatus::Failed, "run_1")
            .expect("failed is an error");
        assert_eq!(failed.kind, AssistantErrorKind::RunFailed);
        assert!(failed.message.contains("failed"));

        let expired = AssistantError::for_terminal_status(RunStatus::Expired, "run_1")
            .expect("expired is an error");
        assert_eq!(expired.kind, AssistantErrorKind::RunExpired);

        let cancelled = AssistantError::for_terminal_status(RunStatus::Cancelled, "run_1")
            .expect("cancelled is an error");
        assert_eq!(cancelled.kind, AssistantErrorKind::RunCancelled);

        assert!(AssistantError::for_terminal_status(RunStatus::Completed, "run_1").is_none());
        assert!(AssistantError::for_terminal_status(RunStatus::InProgress, "run_1").is_none());
    }

    #[test]
    fn kind_serializes_in_snake_case() {
        let encoded = serde_json::to_string(&AssistantErrorKind::RunCancelled).expect("encode");
        assert_eq!(encoded, "\"run_cancelled\"");
        assert_eq!(AssistantErrorKind::Timeout.as_str(), "timeout");
    }
}
