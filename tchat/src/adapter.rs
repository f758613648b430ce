//! The uniform operation set both adapter variants implement.
//!
//! Orchestrators hold adapters as `Arc<dyn ProviderAdapter>`; every method
//! returns a boxed future so the trait stays object safe.

use tcommon::{AgentId, BoxFuture, ThreadId};
use tprovider::{Message, ProviderId};

use crate::{AssistantError, SendOutcome};

pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Provisions the backend-side agent. Repeat calls after a success return
    /// the existing id without contacting the backend.
    fn create_agent<'a>(
        &'a self,
        name: &'a str,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<AgentId, AssistantError>>;

    fn agent_id(&self) -> Option<AgentId>;

    fn create_thread<'a>(&'a self) -> BoxFuture<'a, Result<ThreadId, AssistantError>>;

    /// Never fails; backend and validation errors come back as an error outcome.
    fn send_message<'a>(
        &'a self,
        thread_id: Option<ThreadId>,
        content: &'a str,
    ) -> BoxFuture<'a, SendOutcome>;

    /// Full stored log in insertion order; empty for unknown threads.
    fn history<'a>(&'a self, thread_id: &'a ThreadId) -> BoxFuture<'a, Vec<Message>>;

    /// Truncates the log. `false` for unknown threads.
    fn clear<'a>(&'a self, thread_id: &'a ThreadId) -> BoxFuture<'a, bool>;
}
