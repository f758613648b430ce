//! Wire shapes for the Assistants v2 REST surface.

use serde::{Deserialize, Serialize};

use crate::{Message, MessageAck, ProviderError, Role, RunHandle, RunStatus};

#[derive(Debug, Serialize)]
pub(crate) struct CreateAssistantBody<'a> {
    pub name: &'a str,
    pub instructions: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateMessageBody<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRunBody<'a> {
    pub assistant_id: &'a str,
}

/// Any object where only the id is needed (assistant, thread).
#[derive(Debug, Deserialize)]
pub(crate) struct ApiObject {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiDeleted {
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRun {
    pub id: String,
    pub status: String,
}

impl From<ApiRun> for RunHandle {
    fn from(value: ApiRun) -> Self {
        Self {
            status: parse_run_status(&value.status),
            run_id: value.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    pub id: String,
    pub role: String,
    pub created_at: Option<u64>,
    #[serde(default)]
    pub content: Vec<ApiContentPart>,
}

impl From<&ApiMessage> for MessageAck {
    fn from(value: &ApiMessage) -> Self {
        Self {
            message_id: value.id.clone(),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<ApiText>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiText {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessageList {
    #[serde(default)]
    pub data: Vec<ApiMessage>,
}

impl TryFrom<ApiMessage> for Message {
    type Error = ProviderError;

    fn try_from(value: ApiMessage) -> Result<Self, Self::Error> {
        let role = match value.role.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            other => {
                return Err(ProviderError::transport(format!(
                    "unexpected message role '{other}'"
                )));
            }
        };

        let content = value
            .content
            .into_iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.map(|text| text.value))
            .collect::<Vec<_>>()
            .join("\n");

        let message = Message::new(role, content);
        Ok(match value.created_at {
            Some(created_at) => message.with_timestamp(created_at),
            None => message,
        })
    }
}

/// Messages are requested newest first; callers expect oldest first.
pub(crate) fn messages_oldest_first(list: ApiMessageList) -> Result<Vec<Message>, ProviderError> {
    let mut messages = list
        .data
        .into_iter()
        .map(Message::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    messages.reverse();
    Ok(messages)
}

/// Statuses that need caller action or ended partially count as failures.
pub(crate) fn parse_run_status(value: &str) -> RunStatus {
    match value {
        "queued" => RunStatus::Queued,
        "in_progress" => RunStatus::InProgress,
        "cancelling" => RunStatus::Cancelling,
        "completed" => RunStatus::Completed,
        "expired" => RunStatus::Expired,
        "cancelled" => RunStatus::Cancelled,
        _ => RunStatus::Failed,
    }
}
