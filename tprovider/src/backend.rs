//! Capability contracts expected of the two backend interaction models.
//!
//! `RunBackend` is a backend with native threads and asynchronous runs;
//! `CompletionBackend` has no session concept and must be sent the whole
//! conversation on every call.

use std::future::Future;
use std::pin::Pin;

use tcommon::{AgentId, ThreadId};

use crate::{
    AgentSpec, CompletionRequest, Message, MessageAck, ProviderError, RunHandle, RunStatus,
};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait RunBackend: Send + Sync {
    fn create_agent<'a>(
        &'a self,
        spec: &'a AgentSpec,
    ) -> ProviderFuture<'a, Result<AgentId, ProviderError>>;

    fn delete_agent<'a>(
        &'a self,
        agent_id: &'a AgentId,
    ) -> ProviderFuture<'a, Result<bool, ProviderError>>;

    fn create_thread<'a>(&'a self) -> ProviderFuture<'a, Result<ThreadId, ProviderError>>;

    fn post_message<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        message: &'a Message,
    ) -> ProviderFuture<'a, Result<MessageAck, ProviderError>>;

    fn start_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        agent_id: &'a AgentId,
    ) -> ProviderFuture<'a, Result<RunHandle, ProviderError>>;

    fn run_status<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a str,
    ) -> ProviderFuture<'a, Result<RunStatus, ProviderError>>;

    fn cancel_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a str,
    ) -> ProviderFuture<'a, Result<(), ProviderError>>;

    /// Messages of the remote thread, oldest first.
    fn list_messages<'a>(
        &'a self,
        thread_id: &'a ThreadId,
    ) -> ProviderFuture<'a, Result<Vec<Message>, ProviderError>>;
}

pub trait CompletionBackend: Send + Sync {
    /// Returns the reply text for the full replayed context in `request`.
    fn chat_complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;

    fn list_models<'a>(&'a self) -> ProviderFuture<'a, Result<Vec<String>, ProviderError>>;
}
