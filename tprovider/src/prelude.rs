//! Common `tprovider` imports for downstream crates.

pub use crate::{
    AgentConfig, AgentSpec, CompletionBackend, CompletionRequest, Message, MessageAck,
    PollPolicy, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, Role, RunBackend,
    RunHandle, RunStatus, SecretString,
};
pub use tcommon::{AgentId, BoxFuture, GenerationOptions, ThreadId};
