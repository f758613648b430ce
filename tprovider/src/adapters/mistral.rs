//! Mistral chat-completions backend implemented over reqwest.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::adapters::http::{endpoint, send_json};
use crate::{
    CompletionBackend, CompletionRequest, Message, ProviderError, ProviderFuture, SecretString,
};

pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
const BACKEND_LABEL: &str = "Mistral";

#[derive(Debug)]
pub struct MistralHttpBackend {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl MistralHttpBackend {
    pub fn new(client: Client, api_key: SecretString) -> Self {
        Self {
            client,
            base_url: MISTRAL_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(self.api_key.expose())
    }
}

impl CompletionBackend for MistralHttpBackend {
    fn chat_complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let body = ChatBody::from(&request);
            let builder = self
                .authorize(self.client.post(endpoint(&self.base_url, "chat/completions")))
                .json(&body);
            let response: ChatResponse = send_json(builder, BACKEND_LABEL).await?;
            response.into_text()
        })
    }

    fn list_models<'a>(&'a self) -> ProviderFuture<'a, Result<Vec<String>, ProviderError>> {
        Box::pin(async move {
            let builder = self.authorize(self.client.get(endpoint(&self.base_url, "models")));
            let models: ModelList = send_json(builder, BACKEND_LABEL).await?;
            Ok(models.data.into_iter().map(|model| model.id).collect())
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> From<&'a CompletionRequest> for ChatBody<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::transport("Mistral response contained no choices"))
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[cfg(test)]
mod tests {
    use tcommon::GenerationOptions;

    use super::*;
    use crate::{ProviderErrorKind, Role};

    #[test]
    fn chat_body_carries_full_context_and_options() {
        let request = CompletionRequest::new(
            "mistral-large-latest",
            vec![
                Message::new(Role::System, "Be brief."),
                Message::new(Role::User, "Hi"),
            ],
        )
        .with_options(GenerationOptions::default().with_temperature(0.7).with_max_tokens(1000));

        let encoded = serde_json::to_value(ChatBody::from(&request)).expect("encode");

        assert_eq!(encoded["model"], "mistral-large-latest");
        assert_eq!(encoded["messages"][0]["role"], "system");
        assert_eq!(encoded["messages"][1]["content"], "Hi");
        assert_eq!(encoded["max_tokens"], 1000);
        assert!(encoded["temperature"].as_f64().is_some());
    }

    #[test]
    fn chat_body_omits_unset_options() {
        let request = CompletionRequest::new("m", vec![Message::new(Role::User, "Hi")]);
        let encoded = serde_json::to_value(ChatBody::from(&request)).expect("encode");

        assert!(encoded.get("temperature").is_none());
        assert!(encoded.get("max_tokens").is_none());
    }

    #[test]
    fn chat_response_takes_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"},"finish_reason":"stop"}]}"#,
        )
        .expect("response should parse");

        assert_eq!(response.into_text().expect("text"), "Hello!");
    }

    #[test]
    fn empty_choices_are_a_transport_error() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[]}"#).expect("response should parse");

        let error = response.into_text().expect_err("no choices");
        assert_eq!(error.kind, ProviderErrorKind::Transport);
    }

    #[test]
    fn model_list_parses_ids() {
        let models: ModelList = serde_json::from_str(
            r#"{"object":"list","data":[{"id":"mistral-large-latest"},{"id":"mistral-small-latest"}]}"#,
        )
        .expect("models should parse");

        let ids = models.data.into_iter().map(|model| model.id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["mistral-large-latest", "mistral-small-latest"]);
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_sending() {
        let backend = MistralHttpBackend::new(Client::new(), SecretString::new("key"))
            .with_base_url("http://127.0.0.1:9/v1");

        let error = backend
            .chat_complete(CompletionRequest::new("m", Vec::new()))
            .await
            .expect_err("empty context should be rejected");

        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }
}
