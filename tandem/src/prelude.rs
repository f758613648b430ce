//! Common imports for most tandem applications.

pub use crate::{
    AgentOutcome, AgentProfile, CompareReport, HealthReport, HistoryResponse, InitializeReport,
    MessageResponse, Orchestrator, OrchestratorBuilder, ProviderStatusSnapshot, TandemConfig,
    ThreadResponse, build_orchestrator, build_orchestrator_with_hooks,
};
pub use crate::{
    AgentId, AssistantError, AssistantErrorKind, AssistantHooks, Message, OutcomeStatus,
    PollPolicy, ProviderAdapter, ProviderId, Role, RunStatus, SecretString, ThreadId,
};
