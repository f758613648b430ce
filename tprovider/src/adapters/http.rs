//! Shared reqwest helpers: endpoint joining, send-error mapping, error bodies.

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::ProviderError;

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) async fn send_json<T>(builder: RequestBuilder, backend: &str) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    let response = builder.send().await.map_err(map_send_error)?;

    if !response.status().is_success() {
        return Err(parse_error(response, backend).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ProviderError::transport(err.to_string()))
}

fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else if err.is_connect() {
        ProviderError::unavailable(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}

async fn parse_error(response: Response, backend: &str) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| format!("{backend} request failed with status {status}"));

    ProviderError::from_status(status.as_u16(), message)
}

/// Accepts both `{"error":{"message":..}}` and flat `{"message":..}` bodies.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ApiErrorEnvelope>(body).ok()?;
    parsed
        .error
        .map(|error| error.message)
        .or(parsed.message)
        .filter(|message| !message.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiError>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        assert_eq!(
            endpoint("https://api.example.com/v1/", "/threads"),
            "https://api.example.com/v1/threads"
        );
    }

    #[test]
    fn extract_error_message_supports_nested_and_flat_bodies() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"bad key"}}"#).as_deref(),
            Some("bad key")
        );
        assert_eq!(
            extract_error_message(r#"{"message":"Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(extract_error_message("not json"), None);
    }
}
