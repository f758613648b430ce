use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tchat::{AssistantError, AssistantHooks};
use tcommon::{AgentId, ThreadId};
use tprovider::{ProviderId, RunStatus};

/// Wraps hooks so a panicking observer never breaks the observed operation.
pub struct SafeAssistantHooks<H> {
    inner: H,
}

impl<H> SafeAssistantHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H> AssistantHooks for SafeAssistantHooks<H>
where
    H: AssistantHooks,
{
    fn on_agent_created(&self, provider: ProviderId, agent_id: &AgentId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_agent_created(provider, agent_id)
        }));
    }

    fn on_agent_failed(&self, provider: ProviderId, error: &AssistantError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_agent_failed(provider, error)
        }));
    }

    fn on_thread_created(&self, provider: ProviderId, thread_id: &ThreadId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_thread_created(provider, thread_id)
        }));
    }

    fn on_thread_cleared(&self, provider: ProviderId, thread_id: &ThreadId, existed: bool) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_thread_cleared(provider, thread_id, existed)
        }));
    }

    fn on_send_start(&self, provider: ProviderId, thread_id: Option<&ThreadId>) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_send_start(provider, thread_id)
        }));
    }

    fn on_send_success(&self, provider: ProviderId, thread_id: &ThreadId, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_send_success(provider, thread_id, elapsed)
        }));
    }

    fn on_send_failure(
        &self,
        provider: ProviderId,
        thread_id: Option<&ThreadId>,
        error: &AssistantError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_send_failure(provider, thread_id, error, elapsed)
        }));
    }

    fn on_run_started(&self, provider: ProviderId, thread_id: &ThreadId, run_id: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_started(provider, thread_id, run_id)
        }));
    }

    fn on_run_poll(
        &self,
        provider: ProviderId,
        thread_id: &ThreadId,
        run_id: &str,
        poll: u32,
        status: RunStatus,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_run_poll(provider, thread_id, run_id, poll, status)
        }));
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
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_run_terminal(provider, thread_id, run_id, status, polls, elapsed)
        }));
    }

    fn on_run_timeout(
        &self,
        provider: ProviderId,
        thread_id: &ThreadId,
        run_id: &str,
        polls: u32,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_run_timeout(provider, thread_id, run_id, polls, elapsed)
        }));
    }

    fn on_initialize_complete(&self, succeeded: usize, failed: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_initialize_complete(succeeded, failed)
        }));
    }
}
