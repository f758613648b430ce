//! Backend boundary for the two assistant interaction models.
//!
//! Core logic depends only on the `RunBackend` and `CompletionBackend`
//! traits; the reqwest implementations live under [`adapters`] behind
//! `provider-*` features.

mod backend;
mod credentials;
mod error;
mod model;
mod polling;

pub mod adapters;
pub mod prelude;

pub use backend::{CompletionBackend, ProviderFuture, RunBackend};
pub use credentials::SecretString;
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    AgentConfig, AgentSpec, CompletionRequest, Message, MessageAck, ProviderId, Role, RunHandle,
    RunStatus,
};
pub use polling::PollPolicy;
