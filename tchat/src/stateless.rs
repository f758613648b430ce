//! Adapter for completion backends with no session concept.
//!
//! Continuity comes entirely from the local log: every send replays the whole
//! thread (plus the agent instructions when the thread is empty) to the
//! backend, so request size grows with the conversation.

use std::sync::Arc;

use tcommon::{AgentId, BoxFuture, GenerationOptions, ThreadId};
use tokio::time::Instant;
use tprovider::{
    AgentConfig, AgentSpec, CompletionBackend, CompletionRequest, Message, ProviderId, Role,
};
use uuid::Uuid;

use crate::agent::AgentSlot;
use crate::{
    AssistantError, AssistantHooks, ConversationStore, NoopAssistantHooks, ProviderAdapter,
    SendOutcome, ThreadLog,
};

const PROVIDER: ProviderId = ProviderId::Stateless;

pub const DEFAULT_AGENT_NAME: &str = "Stateless Assistant";
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant.";

pub fn default_generation_options() -> GenerationOptions {
    GenerationOptions::default()
        .with_temperature(0.7)
        .with_max_tokens(1000)
}

fn short_hex(len: usize) -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(len);
    hex
}

pub struct StatelessCompletionAdapter {
    backend: Arc<dyn CompletionBackend>,
    store: ConversationStore,
    model: String,
    options: GenerationOptions,
    agent: AgentSlot,
    hooks: Arc<dyn AssistantHooks>,
}

impl StatelessCompletionAdapter {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            store: ConversationStore::new(),
            model: model.into(),
            options: default_generation_options(),
            agent: AgentSlot::default(),
            hooks: Arc::new(NoopAssistantHooks),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn AssistantHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// The created agent, or the default configuration used before creation.
    pub fn agent(&self) -> AgentConfig {
        self.agent.get().unwrap_or_else(|| AgentConfig {
            id: AgentId::from("agent_default"),
            spec: AgentSpec::new(DEFAULT_AGENT_NAME, DEFAULT_INSTRUCTIONS, self.model.clone()),
        })
    }

    /// Backend model listing; the configured model alone if listing fails.
    pub async fn available_models(&self) -> Vec<String> {
        match self.backend.list_models().await {
            Ok(models) if !models.is_empty() => models,
            Ok(_) | Err(_) => vec![self.model.clone()],
        }
    }

    fn open_thread(&self) -> ThreadId {
        loop {
            let thread_id = ThreadId::new(format!("thread_{}", short_hex(12)));
            if self.store.register(thread_id.clone()) {
                self.hooks.on_thread_created(PROVIDER, &thread_id);
                return thread_id;
            }
        }
    }

    fn build_request(&self, log: &ThreadLog, user: &Message) -> CompletionRequest {
        let agent = self.agent();
        let mut messages = Vec::with_capacity(log.messages().len() + 2);
        if log.is_empty() {
            messages.push(Message::new(Role::System, agent.spec.instructions));
        }
        messages.extend(log.messages().iter().cloned());
        messages.push(user.clone());

        CompletionRequest::new(agent.spec.model, messages).with_options(self.options)
    }

    async fn exchange(&self, log: &mut ThreadLog, content: &str) -> Result<String, AssistantError> {
        let user = Message::new(Role::User, content);
        let request = self.build_request(log, &user);
        let reply = self.backend.chat_complete(request).await?;

        log.append(user);
        log.append(Message::new(Role::Assistant, reply.clone()));
        Ok(reply)
    }

    fn fail(&self, error: AssistantError, thread_id: Option<ThreadId>, started: Instant) -> SendOutcome {
        self.hooks
            .on_send_failure(PROVIDER, thread_id.as_ref(), &error, started.elapsed());
        SendOutcome::failure(error, thread_id)
    }
}

impl ProviderAdapter for StatelessCompletionAdapter {
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
                    Ok(AgentConfig {
                        id: AgentId::new(format!("agent_{}", short_hex(8))),
                        spec,
                    })
                })
                .await
        })
    }

    fn agent_id(&self) -> Option<AgentId> {
        self.agent.get().map(|config| config.id)
    }

    fn create_thread<'a>(&'a self) -> BoxFuture<'a, Result<ThreadId, AssistantError>> {
        Box::pin(async move { Ok(self.open_thread()) })
    }

    fn send_message<'a>(
        &'a self,
        thread_id: Option<ThreadId>,
        content: &'a str,
    ) -> BoxFuture<'a, SendOutcome> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_send_start(PROVIDER, thread_id.as_ref());

            if content.trim().is_empty() {
                let error = AssistantError::invalid_request("message content must not be empty");
                return self.fail(error, thread_id, started);
            }

            if let Some(thread_id) = thread_id.as_ref().filter(|id| id.is_blank()) {
                let error = AssistantError::invalid_thread("thread id must not be blank");
                return self.fail(error, Some(thread_id.clone()), started);
            }

            let thread_id = thread_id.unwrap_or_else(|| self.open_thread());
            let Some(mut log) = self.store.lock(&thread_id).await else {
                let error = AssistantError::invalid_thread(format!("unknown thread '{thread_id}'"));
                return self.fail(error, Some(thread_id), started);
            };

            let result = self.exchange(&mut log, content).await;
            drop(log);

            match result {
                Ok(reply) => {
                    self.hooks
                        .on_send_success(PROVIDER, &thread_id, started.elapsed());
                    SendOutcome::success(reply, thread_id)
                }
                Err(error) => self.fail(error, Some(thread_id), started),
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
