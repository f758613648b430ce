//! One adapter per provider behind a single, provider-validated operation set.
//!
//! Multi-provider operations (`initialize`, `compare_responses`) drive every
//! provider concurrently and isolate failures, including panics, to the
//! provider that raised them.

use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::join_all;
use tchat::{
    AssistantError, AssistantHooks, NoopAssistantHooks, OutcomeStatus, ProviderAdapter,
    SendOutcome,
};
use tcommon::{Registry, ThreadId};
use tprovider::ProviderId;

use crate::{
    AgentOutcome, CompareReport, HealthReport, HistoryResponse, InitializeReport,
    MessageResponse, ProviderStatusSnapshot, ThreadResponse,
};

/// Agent name and instructions used by `initialize` for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub name: String,
    pub instructions: String,
}

impl AgentProfile {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
        }
    }

    pub fn default_for(provider: ProviderId) -> Self {
        match provider {
            ProviderId::StatefulRun => Self::new(
                "Task Analyst",
                "You are a thorough task management assistant. Break complex work into \
                 steps, prioritise it, and give structured, actionable advice.",
            ),
            ProviderId::Stateless => Self::new(
                "Quick Task Helper",
                "You are a fast task management assistant. Give short, direct and \
                 practical answers.",
            ),
        }
    }
}

pub struct OrchestratorBuilder {
    adapters: Registry<ProviderId, Arc<dyn ProviderAdapter>>,
    profiles: BTreeMap<ProviderId, AgentProfile>,
    hooks: Arc<dyn AssistantHooks>,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self {
            adapters: Registry::new(),
            profiles: BTreeMap::new(),
            hooks: Arc::new(NoopAssistantHooks),
        }
    }
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter under its own provider id, replacing any previous one.
    pub fn adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.id(), adapter);
        self
    }

    pub fn profile(mut self, provider: ProviderId, profile: AgentProfile) -> Self {
        self.profiles.insert(provider, profile);
        self
    }

    pub fn profiles(mut self, profiles: BTreeMap<ProviderId, AgentProfile>) -> Self {
        self.profiles.extend(profiles);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn AssistantHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Fails unless every known provider has an adapter.
    pub fn build(self) -> Result<Orchestrator, AssistantError> {
        if let Some(missing) = ProviderId::ALL
            .iter()
            .find(|provider| !self.adapters.contains_key(*provider))
        {
            return Err(AssistantError::invalid_config(format!(
                "no adapter registered for provider '{missing}'"
            )));
        }

        let mut profiles = self.profiles;
        for provider in ProviderId::ALL {
            profiles
                .entry(provider)
                .or_insert_with(|| AgentProfile::default_for(provider));
        }

        Ok(Orchestrator {
            adapters: self.adapters,
            profiles,
            hooks: self.hooks,
        })
    }
}

pub struct Orchestrator {
    adapters: Registry<ProviderId, Arc<dyn ProviderAdapter>>,
    profiles: BTreeMap<ProviderId, AgentProfile>,
    hooks: Arc<dyn AssistantHooks>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn adapter(&self, provider: ProviderId) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.get(&provider)
    }

    fn resolve(
        &self,
        provider: &str,
    ) -> Result<(ProviderId, &Arc<dyn ProviderAdapter>), AssistantError> {
        let id = provider
            .parse::<ProviderId>()
            .map_err(|_| AssistantError::invalid_provider(format!("unknown provider '{provider}'")))?;
        let adapter = self.adapters.get(&id).ok_or_else(|| {
            AssistantError::invalid_provider(format!("provider '{id}' is not configured"))
        })?;
        Ok((id, adapter))
    }

    /// Creates an agent for every provider; never fails as a whole.
    pub async fn initialize(&self) -> InitializeReport {
        let attempts = ProviderId::ALL.into_iter().map(|provider| async move {
            let outcome = match self.adapters.get(&provider) {
                Some(adapter) => {
                    let profile = self
                        .profiles
                        .get(&provider)
                        .cloned()
                        .unwrap_or_else(|| AgentProfile::default_for(provider));
                    AssertUnwindSafe(adapter.create_agent(&profile.name, &profile.instructions))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| {
                            Err(AssistantError::provider_unavailable(format!(
                                "{provider} agent creation panicked"
                            )))
                        })
                }
                None => Err(AssistantError::invalid_provider(format!(
                    "provider '{provider}' is not configured"
                ))),
            };
            (provider, outcome)
        });

        let mut results = BTreeMap::new();
        let mut failed = 0;
        for (provider, outcome) in join_all(attempts).await {
            let entry = match outcome {
                Ok(agent_id) => {
                    self.hooks.on_agent_created(provider, &agent_id);
                    AgentOutcome::Created(agent_id)
                }
                Err(error) => {
                    failed += 1;
                    self.hooks.on_agent_failed(provider, &error);
                    AgentOutcome::Failed(format!("Error: {}", error.message))
                }
            };
            results.insert(provider, entry);
        }

        self.hooks
            .on_initialize_complete(results.len() - failed, failed);
        InitializeReport { results }
    }

    pub async fn send_message(
        &self,
        provider: &str,
        content: &str,
        thread_id: Option<ThreadId>,
    ) -> Result<MessageResponse, AssistantError> {
        let (id, adapter) = self.resolve(provider)?;
        let outcome = adapter.send_message(thread_id, content).await;
        Ok(MessageResponse::from_outcome(id, outcome))
    }

    pub async fn create_thread(&self, provider: &str) -> Result<ThreadResponse, AssistantError> {
        let (id, adapter) = self.resolve(provider)?;
        let thread_id = adapter.create_thread().await?;
        Ok(ThreadResponse {
            provider: id,
            thread_id,
            status: OutcomeStatus::Success,
        })
    }

    /// Unknown threads yield an empty conversation, not an error.
    pub async fn get_history(
        &self,
        thread_id: &ThreadId,
        provider: &str,
    ) -> Result<HistoryResponse, AssistantError> {
        let (id, adapter) = self.resolve(provider)?;
        let conversation = adapter.history(thread_id).await;
        Ok(HistoryResponse {
            provider: id,
            thread_id: thread_id.clone(),
            conversation,
            status: OutcomeStatus::Success,
        })
    }

    pub async fn clear_thread(
        &self,
        thread_id: &ThreadId,
        provider: &str,
    ) -> Result<bool, AssistantError> {
        let (_, adapter) = self.resolve(provider)?;
        Ok(adapter.clear(thread_id).await)
    }

    /// Sends `content` to every provider at once. Providers without an entry
    /// in `thread_ids` get a fresh thread.
    pub async fn compare_responses(
        &self,
        content: &str,
        thread_ids: Option<HashMap<ProviderId, ThreadId>>,
    ) -> CompareReport {
        let thread_ids = thread_ids.unwrap_or_default();
        let runs = ProviderId::ALL.into_iter().map(|provider| {
            let thread_id = thread_ids.get(&provider).cloned();
            let adapter = self.adapters.get(&provider).cloned();
            async move {
                let outcome = match adapter {
                    Some(adapter) => AssertUnwindSafe(adapter.send_message(thread_id.clone(), content))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| {
                            SendOutcome::failure(
                                AssistantError::provider_unavailable(format!(
                                    "{provider} adapter panicked"
                                )),
                                thread_id,
                            )
                        }),
                    None => SendOutcome::failure(
                        AssistantError::invalid_provider(format!(
                            "provider '{provider}' is not configured"
                        )),
                        thread_id,
                    ),
                };
                (provider, MessageResponse::from_outcome(provider, outcome))
            }
        });

        CompareReport {
            message: content.to_string(),
            responses: join_all(runs).await.into_iter().collect(),
        }
    }

    /// Active agent ids per provider plus every known provider type.
    pub fn get_status(&self) -> ProviderStatusSnapshot {
        let active_agents = self
            .adapters
            .iter()
            .filter_map(|(provider, adapter)| {
                adapter
                    .agent_id()
                    .map(|agent_id| (*provider, agent_id))
            })
            .collect();

        ProviderStatusSnapshot {
            active_agents,
            available_types: ProviderId::ALL.to_vec(),
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy".to_string(),
            service: "assistant".to_string(),
            available_assistants: ProviderId::ALL.to_vec(),
        }
    }
}
