//! Metrics-based hooks for adapter and orchestrator activity.
//!
//! ```rust
//! use tchat::AssistantHooks;
//! use tobserve::MetricsObservabilityHooks;
//!
//! fn accepts_hooks(_hooks: &dyn AssistantHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use tchat::{AssistantError, AssistantHooks};
use tcommon::{AgentId, ThreadId};
use tprovider::{ProviderId, RunStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl AssistantHooks for MetricsObservabilityHooks {
    fn on_agent_created(&self, provider: ProviderId, _agent_id: &AgentId) {
        metrics::counter!(
            "tandem_agent_created_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_agent_failed(&self, provider: ProviderId, error: &AssistantError) {
        metrics::counter!(
            "tandem_agent_failed_total",
            "provider" => provider.to_string(),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
    }

    fn on_thread_created(&self, provider: ProviderId, _thread_id: &ThreadId) {
        metrics::counter!(
            "tandem_thread_created_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_thread_cleared(&self, provider: ProviderId, _thread_id: &ThreadId, existed: bool) {
        metrics::counter!(
            "tandem_thread_cleared_total",
            "provider" => provider.to_string(),
            "existed" => existed.to_string()
        )
        .increment(1);
    }

    fn on_send_start(&self, provider: ProviderId, _thread_id: Option<&ThreadId>) {
        metrics::counter!(
            "tandem_send_start_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_send_success(&self, provider: ProviderId, _thread_id: &ThreadId, elapsed: Duration) {
        metrics::counter!(
            "tandem_send_success_total",
            "provider" => provider.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "tandem_send_duration_seconds",
            "provider" => provider.to_string(),
            "outcome" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_send_failure(
        &self,
        provider: ProviderId,
        _thread_id: Option<&ThreadId>,
        error: &AssistantError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tandem_send_failure_total",
            "provider" => provider.to_string(),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "tandem_send_duration_seconds",
            "provider" => provider.to_string(),
            "outcome" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_run_started(&self, provider: ProviderId, _thread_id: &ThreadId, _run_id: &str) {
        metrics::counter!(
            "tandem_run_started_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_run_poll(
        &self,
        provider: ProviderId,
        _thread_id: &ThreadId,
        _run_id: &str,
        _poll: u32,
        _status: RunStatus,
    ) {
        metrics::counter!(
            "tandem_run_poll_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_run_terminal(
        &self,
        provider: ProviderId,
        _thread_id: &ThreadId,
        _run_id: &str,
        status: RunStatus,
        polls: u32,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tandem_run_terminal_total",
            "provider" => provider.to_string(),
            "status" => status.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "tandem_run_polls",
            "provider" => provider.to_string()
        )
        .record(f64::from(polls));
        metrics::histogram!(
            "tandem_run_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_run_timeout(
        &self,
        provider: ProviderId,
        _thread_id: &ThreadId,
        _run_id: &str,
        _polls: u32,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tandem_run_timeout_total",
            "provider" => provider.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "tandem_run_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_initialize_complete(&self, succeeded: usize, failed: usize) {
        metrics::gauge!("tandem_initialized_providers", "outcome" => "success")
            .set(succeeded as f64);
        metrics::gauge!("tandem_initialized_providers", "outcome" => "failure")
            .set(failed as f64);
    }
}
