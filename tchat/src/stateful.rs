//! Adapter for backends with native threads and asynchronous runs.
//!
//! A send posts the user message to the remote thread, starts a run, and
//! polls it with bounded backoff until it reaches a terminal state or the
//! policy's maximum wait elapses. The thread's log stays locked for the whole
//! exchange, so a second send to the same thread waits for the first run.
//!
//! The local log records an exchange only after the run completes with a
//! reply. A user message posted for a run that then fails or times out stays
//! on the remote thread but not in the local history.

use std::sync::Arc;
use std::time::Duration;

use tcommon::{AgentId, BoxFuture, ThreadId};
use tokio::time::Instant;
use tprovider::{
    AgentConfig, AgentSpec, Message, PollPolicy, ProviderError, ProviderId, Role, RunBackend,
    RunHandle, RunStatus,
};

use crate::agent::AgentSlot;
use crate::{
    AssistantError, AssistantHooks, ConversationStore, NoopAssistantHooks, ProviderAdapter,
    SendOutcome, ThreadLog,
};

const PROVIDER: ProviderId = ProviderId::StatefulRun;

/// Deadline used when `started + max_wait` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Transient view of one in-flight run; lives only as long as the poll loop.
///
/// ```rust
/// use tchat::RunState;
/// use tcommon::ThreadId;
/// use tprovider::{RunHandle, RunStatus};
///
/// let mut state = RunState::new(
///     ThreadId::from("thread_1"),
///     RunHandle { run_id: "run_1".into(), status: RunStatus::Queued },
/// );
/// assert_eq!(state.observe(RunStatus::Cancelling), RunStatus::InProgress);
/// assert_eq!(state.observe(RunStatus::Completed), RunStatus::Completed);
/// assert_eq!(state.observe(RunStatus::InProgress), RunStatus::Completed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub run_id: String,
    pub thread_id: ThreadId,
    pub status: RunStatus,
    pub polls: u32,
}

impl RunState {
    pub fn new(thread_id: ThreadId, handle: RunHandle) -> Self {
        let mut state = Self {
            run_id: handle.run_id,
            thread_id,
            status: RunStatus::Queued,
            polls: 0,
        };
        state.observe(handle.status);
        state
    }

    /// Folds a reported status into the state and returns the stored one.
    /// Terminal states are sticky, `cancelling` is stored as `in_progress`,
    /// and a run never moves back to `queued`.
    pub fn observe(&mut self, reported: RunStatus) -> RunStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        self.status = match reported {
            RunStatus::Cancelling => RunStatus::InProgress,
            RunStatus::Queued if self.status == RunStatus::InProgress => RunStatus::InProgress,
            other => other,
        };
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

struct ExchangeError {
    error: AssistantError,
    run_status: Option<RunStatus>,
}

impl ExchangeError {
    fn during_run(error: AssistantError, state: &RunState) -> Self {
        Self {
            error,
            run_status: Some(state.status),
        }
    }
}

impl From<AssistantError> for ExchangeError {
    fn from(error: AssistantError) -> Self {
        Self {
            error,
            run_status: None,
        }
    }
}

impl From<ProviderError> for ExchangeError {
    fn from(error: ProviderError) -> Self {
        AssistantError::from(error).into()
    }
}

pub struct StatefulRunAdapter {
    backend: Arc<dyn RunBackend>,
    store: ConversationStore,
    model: String,
    policy: PollPolicy,
    agent: AgentSlot,
    hooks: Arc<dyn AssistantHooks>,
}

impl StatefulRunAdapter {
    pub fn new(backend: Arc<dyn RunBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            store: ConversationStore::new(),
            model: model.into(),
            policy: PollPolicy::default(),
            agent: AgentSlot::default(),
            hooks: Arc::new(NoopAssistantHooks),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn AssistantHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn agent(&self) -> Option<AgentConfig> {
        self.agent.get()
    }

    /// Deletes the remote agent. `false` when none exists or the backend refuses.
    pub async fn delete_agent(&self) -> bool {
        let Some(config) = self.agent.get() else {
            return false;
        };

        match self.backend.delete_agent(&config.id).await {
            Ok(true) => {
                self.agent.take();
                true
            }
            Ok(false) | Err(_) => false,
        }
    }

    async fn open_thread(&self) -> Result<ThreadId, AssistantError> {
        let remote = self.backend.create_thread().await?;
        self.store.register_remote(remote.clone(), remote.clone());
        self.hooks.on_thread_created(PROVIDER, &remote);
        Ok(remote)
    }

    fn require_agent(&self, content: &str) -> Result<AgentId, AssistantError> {
        if content.trim().is_empty() {
            return Err(AssistantError::invalid_request(
                "message content must not be empty",
            ));
        }

        self.agent
            .get()
            .map(|config| config.id)
            .ok_or_else(|| AssistantError::invalid_config("agent has not been created"))
    }

    async fn exchange(
        &self,
        log: &mut ThreadLog,
        agent_id: &AgentId,
        content: &str,
    ) -> Result<String, ExchangeError> {
        let remote = match log.remote_id() {
            Some(remote) => remote.clone(),
            None => {
                let remote = self.backend.create_thread().await?;
                log.bind_remote(remote.clone());
                remote
            }
        };

        let user = Message::new(Role::User, content);
        let ack = self.backend.post_message(&remote, &user).await?;
        let handle = self.backend.start_run(&remote, agent_id).await?;
        let mut state = RunState::new(log.thread_id().clone(), handle);
        self.hooks
            .on_run_started(PROVIDER, &state.thread_id, &state.run_id);

        self.await_run(&mut state, &remote)
            .await
            .map_err(|error| ExchangeError::during_run(error, &state))?;

        if let Some(error) = AssistantError::for_terminal_status(state.status, &state.run_id) {
            return Err(ExchangeError::during_run(error, &state));
        }

        let reply = self
            .backend
            .list_messages(&remote)
            .await
            .map_err(|error| ExchangeError::during_run(error.into(), &state))?
            .into_iter()
            .rev()
            .find(|message| message.role == Role::Assistant)
            .ok_or_else(|| {
                ExchangeError::during_run(
                    AssistantError::run_failed(format!(
                        "run {} completed without an assistant message",
                        state.run_id
                    )),
                    &state,
                )
            })?;

        let user = match ack.created_at {
            Some(created_at) => user.with_timestamp(created_at),
            None => user,
        };
        let text = reply.content.clone();
        log.append(user);
        log.append(reply);
        Ok(text)
    }

    async fn await_run(&self, state: &mut RunState, remote: &ThreadId) -> Result<(), AssistantError> {
        let started = Instant::now();
        let deadline = started
            .checked_add(self.policy.max_wait)
            .unwrap_or_else(|| started + FAR_FUTURE);

        while !state.is_terminal() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.abandon_run(state, remote, started).await);
            }

            let delay = self.policy.interval_for_poll(state.polls + 1).min(remaining);
            tokio::time::sleep(delay).await;

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.abandon_run(state, remote, started).await);
            }

            let reported =
                match tokio::time::timeout(remaining, self.backend.run_status(remote, &state.run_id))
                    .await
                {
                    Ok(result) => result?,
                    Err(_) => return Err(self.abandon_run(state, remote, started).await),
                };

            state.polls += 1;
            let stored = state.observe(reported);
            self.hooks
                .on_run_poll(PROVIDER, &state.thread_id, &state.run_id, state.polls, stored);
        }

        self.hooks.on_run_terminal(
            PROVIDER,
            &state.thread_id,
            &state.run_id,
            state.status,
            state.polls,
            started.elapsed(),
        );
        Ok(())
    }

    async fn abandon_run(
        &self,
        state: &RunState,
        remote: &ThreadId,
        started: Instant,
    ) -> AssistantError {
        let elapsed = started.elapsed();
        self.hooks
            .on_run_timeout(PROVIDER, &state.thread_id, &state.run_id, state.polls, elapsed);

        // Best effort; the outcome is a timeout regardless.
        let _ = tokio::time::timeout(
            self.policy.max_interval,
            self.backend.cancel_run(remote, &state.run_id),
        )
        .await;

        AssistantError::timeout(format!(
            "timeout: run {} did not finish within {} ms",
            state.run_id,
            self.policy.max_wait.as_millis()
        ))
    }

    fn fail(
        &self,
        error: AssistantError,
        thread_id: Option<ThreadId>,
        run_status: Option<RunStatus>,
        started: Instant,
    ) -> SendOutcome {
        self.hooks
            .on_send_failure(PROVIDER, thread_id.as_ref(), &error, started.elapsed());

        let outcome = SendOutcome::failure(error, thread_id);
        match run_status {
            Some(status) => outcome.with_run_status(status),
            None => outcome,
        }
    }
}

impl ProviderAdapter for StatefulRunAdapter {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    fn create_agent<'a>(
        &'a self,
        name: &'a str,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<AgentId, AssistantError>> {
        Box::pin(async move {
            let spec = AgentSpec::new(name, instructions, self.model.clone());
            self.agent
                .get_or_create(spec, |spec| async move {
                    let id = self.backend.create_agent(&spec).await?;
                    if id.is_blank() {
                        return Err(AssistantError::provider_unavailable(
                            "backend returned an empty agent id",
                        ));
                    }
                    Ok(AgentConfig { id, spec })
                })
                .await
        })
    }

    fn agent_id(&self) -> Option<AgentId> {
        self.agent.get().map(|config| config.id)
    }

    fn create_thread<'a>(&'a self) -> BoxFuture<'a, Result<ThreadId, AssistantError>> {
        Box::pin(self.open_thread())
    }

    fn send_message<'a>(
        &'a self,
        thread_id: Option<ThreadId>,
        content: &'a str,
    ) -> BoxFuture<'a, SendOutcome> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_send_start(PROVIDER, thread_id.as_ref());

            let agent_id = match self.require_agent(content) {
                Ok(agent_id) => agent_id,
                Err(error) => return self.fail(error, thread_id, None, started),
            };

            let thread_id = match thread_id {
                Some(thread_id) if thread_id.is_blank() => {
                    let error = AssistantError::invalid_thread("thread id must not be blank");
                    return self.fail(error, Some(thread_id), None, started);
                }
                Some(thread_id) => thread_id,
                None => match self.open_thread().await {
                    Ok(thread_id) => thread_id,
                    Err(error) => return self.fail(error, None, None, started),
                },
            };

            let Some(mut log) = self.store.lock(&thread_id).await else {
                let error = AssistantError::invalid_thread(format!("unknown thread '{thread_id}'"));
                return self.fail(error, Some(thread_id), None, started);
            };

            let result = self.exchange(&mut log, &agent_id, content).await;
            drop(log);

            match result {
                Ok(reply) => {
                    self.hooks
                        .on_send_success(PROVIDER, &thread_id, started.elapsed());
                    SendOutcome::success(reply, thread_id).with_run_status(RunStatus::Completed)
                }
                Err(failure) => {
                    self.fail(failure.error, Some(thread_id), failure.run_status, started)
                }
            }
        })
    }

    fn history<'a>(&'a self, thread_id: &'a ThreadId) -> BoxFuture<'a, Vec<Message>> {
        Box::pin(self.store.history(thread_id))
    }

    fn clear<'a>(&'a self, thread_id: &'a ThreadId) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let existed = self.store.clear(thread_id).await;
            self.hooks.on_thread_cleared(PROVIDER, thread_id, existed);
            existed
        })
    }
}
