//! Conversation state and the two provider adapters.
//!
//! `StatefulRunAdapter` drives a run-based backend through a bounded polling
//! state machine; `StatelessCompletionAdapter` replays the local log on every
//! call. Both keep per-thread logs in their own `ConversationStore` and report
//! failures as `SendOutcome` values rather than errors.

mod adapter;
mod agent;
mod error;
mod hooks;
mod stateful;
mod stateless;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        AssistantError, AssistantErrorKind, AssistantHooks, ConversationStore,
        NoopAssistantHooks, OutcomeStatus, ProviderAdapter, RunState, SendOutcome,
        StatefulRunAdapter, StatelessCompletionAdapter, ThreadLog,
    };
    pub use tcommon::{AgentId, ThreadId};
}

pub use adapter::ProviderAdapter;
pub use error::{AssistantError, AssistantErrorKind};
pub use hooks::{AssistantHooks, NoopAssistantHooks};
pub use stateful::{RunState, StatefulRunAdapter};
pub use stateless::{
    DEFAULT_AGENT_NAME, DEFAULT_INSTRUCTIONS, StatelessCompletionAdapter,
    default_generation_options,
};
pub use store::{ConversationStore, ThreadLog};
pub use types::{OutcomeStatus, SendOutcome};
