//! Uniform response envelopes returned by the orchestrator.
//!
//! ```rust
//! use tandem::{MessageResponse, ProviderId};
//! use tchat::SendOutcome;
//! use tcommon::ThreadId;
//!
//! let outcome = SendOutcome::success("Hello!", ThreadId::from("thread_1"));
//! let response = MessageResponse::from_outcome(ProviderId::Stateless, outcome);
//!
//! assert!(response.is_success());
//! assert_eq!(response.provider.to_string(), "stateless");
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tchat::{AssistantErrorKind, OutcomeStatus, SendOutcome};
use tcommon::{AgentId, ThreadId};
use tprovider::{Message, ProviderId, RunStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    pub provider: ProviderId,
    pub response: String,
    pub thread_id: Option<ThreadId>,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<AssistantErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_status: Option<RunStatus>,
}

impl MessageResponse {
    pub fn from_outcome(provider: ProviderId, outcome: SendOutcome) -> Self {
        let error_kind = outcome.error_kind();
        Self {
            provider,
            response: outcome.response,
            thread_id: outcome.thread_id,
            status: outcome.status,
            error_kind,
            run_status: outcome.run_status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadResponse {
    pub provider: ProviderId,
    pub thread_id: ThreadId,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryResponse {
    pub provider: ProviderId,
    pub thread_id: ThreadId,
    pub conversation: Vec<Message>,
    pub status: OutcomeStatus,
}

/// Agent id on success, `"Error: ..."` text on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AgentOutcome {
    Created(AgentId),
    Failed(String),
}

impl AgentOutcome {
    pub fn agent_id(&self) -> Option<&AgentId> {
        match self {
            Self::Created(agent_id) => Some(agent_id),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitializeReport {
    pub results: BTreeMap<ProviderId, AgentOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReport {
    pub message: String,
    pub responses: BTreeMap<ProviderId, MessageResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatusSnapshot {
    pub active_agents: BTreeMap<ProviderId, AgentId>,
    pub available_types: Vec<ProviderId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub available_assistants: Vec<ProviderId>,
}
