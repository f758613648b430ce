use std::sync::{Arc, Mutex};
use std::time::Duration;

use tchat::{AssistantError, AssistantHooks};
use tcommon::{AgentId, ThreadId};
use tprovider::{ProviderId, RunStatus};

use crate::{MetricsObservabilityHooks, SafeAssistantHooks, TracingObservabilityHooks};

fn exercise_all_callbacks(hooks: &dyn AssistantHooks) {
    let error = AssistantError::timeout("run did not finish");
    let thread = ThreadId::from("thread_1");

    hooks.on_agent_created(ProviderId::StatefulRun, &AgentId::from("asst_1"));
    hooks.on_agent_failed(ProviderId::Stateless, &error);
    hooks.on_thread_created(ProviderId::Stateless, &thread);
    hooks.on_thread_cleared(ProviderId::Stateless, &thread, true);
    hooks.on_send_start(ProviderId::StatefulRun, None);
    hooks.on_send_start(ProviderId::StatefulRun, Some(&thread));
    hooks.on_send_success(ProviderId::StatefulRun, &thread, Duration::from_millis(20));
    hooks.on_send_failure(
        ProviderId::StatefulRun,
        Some(&thread),
        &error,
        Duration::from_millis(20),
    );
    hooks.on_run_started(ProviderId::StatefulRun, &thread, "run_1");
    hooks.on_run_poll(
        ProviderId::StatefulRun,
        &thread,
        "run_1",
        1,
        RunStatus::InProgress,
    );
    hooks.on_run_terminal(
        ProviderId::StatefulRun,
        &thread,
        "run_1",
        RunStatus::Completed,
        3,
        Duration::from_millis(900),
    );
    hooks.on_run_timeout(
        ProviderId::StatefulRun,
        &thread,
        "run_1",
        12,
        Duration::from_secs(60),
    );
    hooks.on_initialize_complete(1, 1);
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    exercise_all_callbacks(&TracingObservabilityHooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    exercise_all_callbacks(&MetricsObservabilityHooks);
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl AssistantHooks for RecordingHooks {
    fn on_send_start(&self, _provider: ProviderId, _thread_id: Option<&ThreadId>) {
        self.events.lock().expect("events lock").push("send_start");
    }

    fn on_run_timeout(
        &self,
        _provider: ProviderId,
        _thread_id: &ThreadId,
        _run_id: &str,
        _polls: u32,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("run_timeout");
    }
}

struct PanickingHooks;

impl AssistantHooks for PanickingHooks {
    fn on_send_start(&self, _provider: ProviderId, _thread_id: Option<&ThreadId>) {
        panic!("observer failure");
    }

    fn on_initialize_complete(&self, _succeeded: usize, _failed: usize) {
        panic!("observer failure");
    }
}

#[test]
fn safe_hooks_forward_to_inner_hooks() {
    let recording = RecordingHooks::default();
    let safe = SafeAssistantHooks::new(recording.clone());

    safe.on_send_start(ProviderId::Stateless, None);
    safe.on_run_timeout(
        ProviderId::StatefulRun,
        &ThreadId::from("thread_1"),
        "run_1",
        4,
        Duration::from_secs(1),
    );

    let events = recording.events.lock().expect("events lock").clone();
    assert_eq!(events, vec!["send_start", "run_timeout"]);
}

#[test]
fn safe_hooks_swallow_observer_panics() {
    let safe = SafeAssistantHooks::new(PanickingHooks);

    safe.on_send_start(ProviderId::Stateless, None);
    safe.on_initialize_complete(2, 0);
    exercise_all_callbacks(&safe);
}
