//! reqwest implementation of `RunBackend` against the Assistants v2 API.

use reqwest::{Client, RequestBuilder};
use tcommon::{AgentId, ThreadId};

use crate::adapters::http::{endpoint, send_json};
use crate::{
    AgentSpec, Message, MessageAck, ProviderError, ProviderFuture, RunBackend, RunHandle,
    RunStatus, SecretString,
};

use super::serde_api::{
    ApiDeleted, ApiMessage, ApiMessageList, ApiObject, ApiRun, CreateAssistantBody,
    CreateMessageBody, CreateRunBody, messages_oldest_first, parse_run_status,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");
const BACKEND_LABEL: &str = "Assistants";
const MESSAGE_PAGE_LIMIT: u32 = 100;

#[derive(Debug)]
pub struct AssistantsHttpBackend {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl AssistantsHttpBackend {
    pub fn new(client: Client, api_key: SecretString) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.api_key.expose())
            .header(BETA_HEADER.0, BETA_HEADER.1)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(endpoint(&self.base_url, path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(endpoint(&self.base_url, path)))
    }
}

impl RunBackend for AssistantsHttpBackend {
    fn create_agent<'a>(
        &'a self,
        spec: &'a AgentSpec,
    ) -> ProviderFuture<'a, Result<AgentId, ProviderError>> {
        Box::pin(async move {
            spec.validate()?;
            let body = CreateAssistantBody {
                name: &spec.name,
                instructions: &spec.instructions,
                model: &spec.model,
            };
            let created: ApiObject =
                send_json(self.post("assistants").json(&body), BACKEND_LABEL).await?;
            Ok(AgentId::new(created.id))
        })
    }

    fn delete_agent<'a>(
        &'a self,
        agent_id: &'a AgentId,
    ) -> ProviderFuture<'a, Result<bool, ProviderError>> {
        Box::pin(async move {
            let url = endpoint(&self.base_url, &format!("assistants/{agent_id}"));
            let deleted: ApiDeleted =
                send_json(self.authorize(self.client.delete(url)), BACKEND_LABEL).await?;
            Ok(deleted.deleted)
        })
    }

    fn create_thread<'a>(&'a self) -> ProviderFuture<'a, Result<ThreadId, ProviderError>> {
        Box::pin(async move {
            let created: ApiObject = send_json(
                self.post("threads").json(&serde_json::json!({})),
                BACKEND_LABEL,
            )
            .await?;
            Ok(ThreadId::new(created.id))
        })
    }

    fn post_message<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        message: &'a Message,
    ) -> ProviderFuture<'a, Result<MessageAck, ProviderError>> {
        Box::pin(async move {
            let body = CreateMessageBody {
                role: message.role.as_str(),
                content: &message.content,
            };
            let created: ApiMessage = send_json(
                self.post(&format!("threads/{thread_id}/messages")).json(&body),
                BACKEND_LABEL,
            )
            .await?;
            Ok(MessageAck::from(&created))
        })
    }

    fn start_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        agent_id: &'a AgentId,
    ) -> ProviderFuture<'a, Result<RunHandle, ProviderError>> {
        Box::pin(async move {
            let body = CreateRunBody {
                assistant_id: agent_id.as_str(),
            };
            let run: ApiRun = send_json(
                self.post(&format!("threads/{thread_id}/runs")).json(&body),
                BACKEND_LABEL,
            )
            .await?;
            Ok(RunHandle::from(run))
        })
    }

    fn run_status<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a str,
    ) -> ProviderFuture<'a, Result<RunStatus, ProviderError>> {
        Box::pin(async move {
            let run: ApiRun = send_json(
                self.get(&format!("threads/{thread_id}/runs/{run_id}")),
                BACKEND_LABEL,
            )
            .await?;
            Ok(parse_run_status(&run.status))
        })
    }

    fn cancel_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a str,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            let _run: ApiRun = send_json(
                self.post(&format!("threads/{thread_id}/runs/{run_id}/cancel")),
                BACKEND_LABEL,
            )
            .await?;
            Ok(())
        })
    }

    fn list_messages<'a>(
        &'a self,
        thread_id: &'a ThreadId,
    ) -> ProviderFuture<'a, Result<Vec<Message>, ProviderError>> {
        Box::pin(async move {
            let request = self
                .get(&format!("threads/{thread_id}/messages"))
                .query(&[("order", "desc".to_string()), ("limit", MESSAGE_PAGE_LIMIT.to_string())]);
            let list: ApiMessageList = send_json(request, BACKEND_LABEL).await?;
            messages_oldest_first(list)
        })
    }
}
