//! Focused unit tests for Assistants adapter internals.

#![cfg(test)]

use reqwest::Client;
use tcommon::ThreadId;

use crate::{ProviderErrorKind, Role, RunBackend, RunHandle, RunStatus, SecretString};

use super::serde_api::{ApiMessageList, ApiRun, messages_oldest_first, parse_run_status};
use super::transport::AssistantsHttpBackend;

#[test]
fn parse_run_status_maps_action_and_partial_states_to_failed() {
    assert_eq!(parse_run_status("queued"), RunStatus::Queued);
    assert_eq!(parse_run_status("in_progress"), RunStatus::InProgress);
    assert_eq!(parse_run_status("cancelling"), RunStatus::Cancelling);
    assert_eq!(parse_run_status("completed"), RunStatus::Completed);
    assert_eq!(parse_run_status("expired"), RunStatus::Expired);
    assert_eq!(parse_run_status("cancelled"), RunStatus::Cancelled);
    assert_eq!(parse_run_status("requires_action"), RunStatus::Failed);
    assert_eq!(parse_run_status("incomplete"), RunStatus::Failed);
    assert_eq!(parse_run_status("something_new"), RunStatus::Failed);
}

#[test]
fn run_payload_converts_to_handle() {
    let run: ApiRun = serde_json::from_str(
        r#"{"id":"run_1","object":"thread.run","status":"queued","thread_id":"thread_1"}"#,
    )
    .expect("run should parse");

    assert_eq!(
        RunHandle::from(run),
        RunHandle {
            run_id: "run_1".to_string(),
            status: RunStatus::Queued,
        }
    );
}

#[test]
fn message_list_is_reversed_and_text_parts_are_joined() {
    let list: ApiMessageList = serde_json::from_str(
        r#"{
            "object": "list",
            "data": [
                {"id":"msg_2","role":"assistant","created_at":1700000010,
                 "content":[{"type":"text","text":{"value":"Hello","annotations":[]}},
                            {"type":"image_file","image_file":{"file_id":"f"}},
                            {"type":"text","text":{"value":"there","annotations":[]}}]},
                {"id":"msg_1","role":"user","created_at":1700000000,
                 "content":[{"type":"text","text":{"value":"Hi","annotations":[]}}]}
            ]
        }"#,
    )
    .expect("list should parse");

    let messages = messages_oldest_first(list).expect("messages should convert");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Hi");
    assert_eq!(messages[0].timestamp, Some(1_700_000_000));
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Hello\nthere");
}

#[test]
fn unknown_message_role_is_rejected() {
    let list: ApiMessageList = serde_json::from_str(
        r#"{"data":[{"id":"msg_1","role":"tool","created_at":null,"content":[]}]}"#,
    )
    .expect("list should parse");

    let error = messages_oldest_first(list).expect_err("role should be rejected");
    assert_eq!(error.kind, ProviderErrorKind::Transport);
}

#[tokio::test]
async fn unreachable_backend_surfaces_retryable_error() {
    let backend = AssistantsHttpBackend::new(Client::new(), SecretString::new("sk-test"))
        .with_base_url("http://127.0.0.1:9/v1");

    let error = backend
        .run_status(&ThreadId::from("thread_1"), "run_1")
        .await
        .expect_err("nothing listens on the discard port");

    assert!(error.retryable);
    assert!(matches!(
        error.kind,
        ProviderErrorKind::Unavailable | ProviderErrorKind::Transport
    ));
}
