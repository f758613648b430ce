//! Structured send outcomes returned by every adapter.
//!
//! ```rust
//! use tchat::{AssistantError, OutcomeStatus, SendOutcome};
//! use tcommon::ThreadId;
//!
//! let ok = SendOutcome::success("Hello!", ThreadId::from("thread_1"));
//! assert!(ok.is_success());
//!
//! let failed = SendOutcome::failure(AssistantError::timeout("run did not finish"), None);
//! assert_eq!(failed.status, OutcomeStatus::Error);
//! assert_eq!(failed.response, "Error: run did not finish");
//! ```

use serde::Serialize;
use tcommon::ThreadId;
use tprovider::RunStatus;

use crate::{AssistantError, AssistantErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Result of one `send_message` call. Failures travel here instead of as `Err`
/// so fan-out callers can inspect each provider independently.
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    pub response: String,
    pub thread_id: Option<ThreadId>,
    pub status: OutcomeStatus,
    pub error: Option<AssistantError>,
    pub run_status: Option<RunStatus>,
}

impl SendOutcome {
    pub fn success(response: impl Into<String>, thread_id: ThreadId) -> Self {
        Self {
            response: response.into(),
            thread_id: Some(thread_id),
            status: OutcomeStatus::Success,
            error: None,
            run_status: None,
        }
    }

    pub fn failure(error: AssistantError, thread_id: Option<ThreadId>) -> Self {
        Self {
            response: format!("Error: {}", error.message),
            thread_id,
            status: OutcomeStatus::Error,
            error: Some(error),
            run_status: None,
        }
    }

    pub fn with_run_status(mut self, status: RunStatus) -> Self {
        self.run_status = Some(status);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn error_kind(&self) -> Option<AssistantErrorKind> {
        self.error.as_ref().map(|error| error.kind)
    }
}
