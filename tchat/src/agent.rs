//! At-most-once agent record shared by both adapter variants.

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use tcommon::AgentId;
use tokio::sync::Mutex as AsyncMutex;
use tprovider::{AgentConfig, AgentSpec};

use crate::AssistantError;

#[derive(Debug, Default)]
pub(crate) struct AgentSlot {
    record: RwLock<Option<AgentConfig>>,
    provisioning: AsyncMutex<()>,
}

impl AgentSlot {
    pub(crate) fn get(&self) -> Option<AgentConfig> {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `create` only when no agent exists; concurrent callers wait for
    /// the first one and then see its record.
    pub(crate) async fn get_or_create<F, Fut>(
        &self,
        spec: AgentSpec,
        create: F,
    ) -> Result<AgentId, AssistantError>
    where
        F: FnOnce(AgentSpec) -> Fut,
        Fut: Future<Output = Result<AgentConfig, AssistantError>>,
    {
        let _provisioning = self.provisioning.lock().await;
        if let Some(existing) = self.get() {
            return Ok(existing.id);
        }

        spec.validate()
            .map_err(|error| AssistantError::invalid_config(error.message))?;
        let config = create(spec).await?;
        let id = config.id.clone();
        *self.record.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
        Ok(id)
    }

    pub(crate) fn take(&self) -> Option<AgentConfig> {
        self.record
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
