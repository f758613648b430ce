//! Single entry point over a run-based and a stateless assistant backend.
//!
//! This crate is the one dependency most applications need. It re-exports the
//! tandem workspace crates, loads [`TandemConfig`] from the environment, and
//! builds an [`Orchestrator`] that routes every operation to the adapter for
//! the requested provider.
//!
//! ```rust,no_run
//! use tandem::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), AssistantError> {
//! let config = TandemConfig::from_env()?;
//! let orchestrator = build_orchestrator(&config)?;
//!
//! let report = orchestrator.initialize().await;
//! println!("{report:?}");
//!
//! let reply = orchestrator
//!     .send_message("stateless", "Plan my week", None)
//!     .await?;
//! println!("{}", reply.response);
//! # Ok(())
//! # }
//! ```

mod config;
mod orchestrator;
mod providers;
mod types;

pub mod prelude;

pub use tchat;
pub use tcommon;
pub use tobserve;
pub use tprovider;

pub use config::{
    CompletionBackendConfig, DEFAULT_ASSISTANT_MODEL, DEFAULT_ASSISTANTS_BASE_URL,
    DEFAULT_MISTRAL_BASE_URL, DEFAULT_MISTRAL_MODEL, DEFAULT_REQUEST_TIMEOUT, MAX_POLL_WAIT,
    RunBackendConfig, TandemConfig,
};
pub use orchestrator::{AgentProfile, Orchestrator, OrchestratorBuilder};
pub use providers::{build_orchestrator, build_orchestrator_with_hooks};
pub use types::{
    AgentOutcome, CompareReport, HealthReport, HistoryResponse, InitializeReport,
    MessageResponse, ProviderStatusSnapshot, ThreadResponse,
};

pub use tchat::{
    AssistantError, AssistantErrorKind, AssistantHooks, OutcomeStatus, ProviderAdapter,
    SendOutcome, StatefulRunAdapter, StatelessCompletionAdapter,
};
pub use tcommon::{AgentId, ThreadId};
pub use tprovider::{Message, PollPolicy, ProviderId, Role, RunStatus, SecretString};
