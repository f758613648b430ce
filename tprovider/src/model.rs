//! Provider identity, conversation messages, agent records, and run lifecycle values.
//!
//! ```rust
//! use tprovider::{Message, ProviderId, Role, RunStatus};
//!
//! let provider: ProviderId = "mistral".parse().expect("alias should parse");
//! assert_eq!(provider, ProviderId::Stateless);
//! assert_eq!(provider.to_string(), "stateless");
//!
//! let message = Message::new(Role::User, "hi").with_timestamp(1_700_000_000);
//! assert_eq!(message.timestamp, Some(1_700_000_000));
//!
//! assert!(RunStatus::Expired.is_terminal());
//! assert!(!RunStatus::Cancelling.is_terminal());
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tcommon::{AgentId, GenerationOptions};

use crate::ProviderError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ProviderId {
    #[serde(rename = "stateful-run")]
    StatefulRun,
    #[serde(rename = "stateless")]
    Stateless,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::StatefulRun, ProviderId::Stateless];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StatefulRun => "stateful-run",
            Self::Stateless => "stateless",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stateful-run" | "stateful_run" | "statefulrun" | "openai" | "assistants" => {
                Ok(Self::StatefulRun)
            }
            "stateless" | "mistral" => Ok(Self::Stateless),
            other => Err(ProviderError::invalid_request(format!(
                "unknown provider '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One immutable conversation entry. `timestamp` is unix seconds when the
/// backend reports one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<u64>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
}

impl AgentSpec {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.name.trim().is_empty() {
            return Err(ProviderError::invalid_request("agent name must not be empty"));
        }

        if self.instructions.trim().is_empty() {
            return Err(ProviderError::invalid_request(
                "agent instructions must not be empty",
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("agent model must not be empty"));
        }

        Ok(())
    }
}

/// Agent record after provisioning; immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub id: AgentId,
    pub spec: AgentSpec,
}

/// Backend acknowledgement for a message appended to a remote thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAck {
    pub message_id: String,
    pub created_at: Option<u64>,
}

/// A freshly started run as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHandle {
    pub run_id: String,
    pub status: RunStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Cancelling,
    Completed,
    Failed,
    Expired,
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Expired | Self::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Cancelling => "cancelling",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full replayed context for one stateless completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one message is required",
            ));
        }

        if let Some(max_tokens) = self.options.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn provider_id_parses_canonical_names_and_aliases() {
        assert_eq!("stateful-run".parse::<ProviderId>(), Ok(ProviderId::StatefulRun));
        assert_eq!(" OpenAI ".parse::<ProviderId>(), Ok(ProviderId::StatefulRun));
        assert_eq!("stateless".parse::<ProviderId>(), Ok(ProviderId::Stateless));
        assert_eq!("Mistral".parse::<ProviderId>(), Ok(ProviderId::Stateless));

        let error = "claude".parse::<ProviderId>().expect_err("unknown provider");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }

    #[test]
    fn provider_id_serializes_with_canonical_name() {
        let encoded = serde_json::to_string(&ProviderId::StatefulRun).expect("encode");
        assert_eq!(encoded, "\"stateful-run\"");
        assert_eq!(ProviderId::Stateless.to_string(), "stateless");
    }

    #[test]
    fn run_status_terminal_set_is_closed() {
        let terminal = [
            RunStatus::Completed,
            RunStatus::Failed,
            RunStatus::Expired,
            RunStatus::Cancelled,
        ];
        let pending = [RunStatus::Queued, RunStatus::InProgress, RunStatus::Cancelling];

        assert!(terminal.iter().all(|status| status.is_terminal()));
        assert!(pending.iter().all(|status| !status.is_terminal()));
    }

    #[test]
    fn agent_spec_rejects_blank_fields() {
        assert!(AgentSpec::new("name", "instructions", "model").validate().is_ok());

        let error = AgentSpec::new(" ", "instructions", "model")
            .validate()
            .expect_err("blank name");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
        assert!(AgentSpec::new("name", "", "model").validate().is_err());
        assert!(AgentSpec::new("name", "instructions", "").validate().is_err());
    }

    #[test]
    fn completion_request_validation_checks_model_messages_and_tokens() {
        let messages = vec![Message::new(Role::User, "hi")];
        assert!(CompletionRequest::new("m", messages.clone()).validate().is_ok());
        assert!(CompletionRequest::new("", messages.clone()).validate().is_err());
        assert!(CompletionRequest::new("m", Vec::new()).validate().is_err());

        let zero_tokens = CompletionRequest::new("m", messages)
            .with_options(GenerationOptions::default().with_max_tokens(0));
        assert!(zero_tokens.validate().is_err());
    }

    #[test]
    fn message_serializes_role_in_lowercase() {
        let encoded =
            serde_json::to_value(Message::new(Role::Assistant, "hello")).expect("encode");
        assert_eq!(encoded["role"], "assistant");
        assert_eq!(encoded["timestamp"], serde_json::Value::Null);
    }
}
