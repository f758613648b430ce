//! Tracing-based hooks for adapter and orchestrator activity.
//!
//! ```rust
//! use tchat::AssistantHooks;
//! use tobserve::TracingObservabilityHooks;
//!
//! fn accepts_hooks(_hooks: &dyn AssistantHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use tchat::{AssistantError, AssistantHooks};
use tcommon::{AgentId, ThreadId};
use tprovider::{ProviderId, RunStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

fn thread_field(thread_id: Option<&ThreadId>) -> &str {
    thread_id.map(ThreadId::as_str).unwrap_or("<new>")
}

impl AssistantHooks for TracingObservabilityHooks {
    fn on_agent_created(&self, provider: ProviderId, agent_id: &AgentId) {
        tracing::info!(
            phase = "agent",
            event = "created",
            provider = %provider,
            agent_id = %agent_id
        );
    }

    fn on_agent_failed(&self, provider: ProviderId, error: &AssistantError) {
        tracing::error!(
            phase = "agent",
            event = "failed",
            provider = %provider,
            error_kind = error.kind.as_str(),
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_thread_created(&self, provider: ProviderId, thread_id: &ThreadId) {
        tracing::info!(
            phase = "thread",
            event = "created",
            provider = %provider,
            thread_id = %thread_id
        );
    }

    fn on_thread_cleared(&self, provider: ProviderId, thread_id: &ThreadId, existed: bool) {
        tracing::info!(
            phase = "thread",
            event = "cleared",
            provider = %provider,
            thread_id = %thread_id,
            existed
        );
    }

    fn on_send_start(&self, provider: ProviderId, thread_id: Option<&ThreadId>) {
        tracing::info!(
            phase = "send",
            event = "start",
            provider = %provider,
            thread_id = thread_field(thread_id)
        );
    }

    fn on_send_success(&self, provider: ProviderId, thread_id: &ThreadId, elapsed: Duration) {
        tracing::info!(
            phase = "send",
            event = "success",
            provider = %provider,
            thread_id = %thread_id,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_send_failure(
        &self,
        provider: ProviderId,
        thread_id: Option<&ThreadId>,
        error: &AssistantError,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "send",
            event = "failure",
            provider = %provider,
            thread_id = thread_field(thread_id),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = error.kind.as_str(),
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_run_started(&self, provider: ProviderId, thread_id: &ThreadId, run_id: &str) {
        tracing::info!(
            phase = "run",
            event = "started",
            provider = %provider,
            thread_id = %thread_id,
            run_id
        );
    }

    fn on_run_poll(
        &self,
        provider: ProviderId,
        thread_id: &ThreadId,
        run_id: &str,
        poll: u32,
        status: RunStatus,
    ) {
        tracing::debug!(
            phase = "run",
            event = "poll",
            provider = %provider,
            thread_id = %thread_id,
            run_id,
            poll,
            status = status.as_str()
        );
    }

    fn on_run_terminal(
        &self,
        provider: ProviderId,
        thread_id: &ThreadId,
        run_id: &str,
        status: RunStatus,
        polls: u32,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "run",
            event = "terminal",
            provider = %provider,
            thread_id = %thread_id,
            run_id,
            status = status.as_str(),
            polls,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_run_timeout(
        &self,
        provider: ProviderId,
        thread_id: &ThreadId,
        run_id: &str,
        polls: u32,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "run",
            event = "timeout",
            provider = %provider,
            thread_id = %thread_id,
            run_id,
            polls,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_initialize_complete(&self, succeeded: usize, failed: usize) {
        if failed == 0 {
            tracing::info!(phase = "initialize", event = "complete", succeeded, failed);
        } else {
            tracing::warn!(phase = "initialize", event = "complete", succeeded, failed);
        }
    }
}
