//! Hook contracts for observing adapter and orchestrator activity.
//!
//! ```rust
//! use tchat::{AssistantHooks, NoopAssistantHooks};
//!
//! fn accepts_hooks(_hooks: &dyn AssistantHooks) {}
//!
//! let hooks = NoopAssistantHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use tcommon::{AgentId, ThreadId};
use tprovider::{ProviderId, RunStatus};

use crate::AssistantError;

pub trait AssistantHooks: Send + Sync {
    fn on_agent_created(&self, _provider: ProviderId, _agent_id: &AgentId) {}

    fn on_agent_failed(&self, _provider: ProviderId, _error: &AssistantError) {}

    fn on_thread_created(&self, _provider: ProviderId, _thread_id: &ThreadId) {}

    fn on_thread_cleared(&self, _provider: ProviderId, _thread_id: &ThreadId, _existed: bool) {}

    fn on_send_start(&self, _provider: ProviderId, _thread_id: Option<&ThreadId>) {}

    fn on_send_success(&self, _provider: ProviderId, _thread_id: &ThreadId, _elapsed: Duration) {}

    fn on_send_failure(
        &self,
        _provider: ProviderId,
        _thread_id: Option<&ThreadId>,
        _error: &AssistantError,
        _elapsed: Duration,
    ) {
    }

    fn on_run_started(&self, _provider: ProviderId, _thread_id: &ThreadId, _run_id: &str) {}

    fn on_run_poll(
        &self,
        _provider: ProviderId,
        _thread_id: &ThreadId,
        _run_id: &str,
        _poll: u32,
        _status: RunStatus,
    ) {
    }

    fn on_run_terminal(
        &self,
        _provider: ProviderId,
        _thread_id: &ThreadId,
        _run_id: &str,
        _status: RunStatus,
        _polls: u32,
        _elapsed: Duration,
    ) {
    }

    fn on_run_timeout(
        &self,
        _provider: ProviderId,
        _thread_id: &ThreadId,
        _run_id: &str,
        _polls: u32,
        _elapsed: Duration,
    ) {
    }

    fn on_initialize_complete(&self, _succeeded: usize, _failed: usize) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAssistantHooks;

impl AssistantHooks for NoopAssistantHooks {}
