//! Wires configured HTTP backends into a ready orchestrator.

use std::sync::Arc;

use reqwest::Client;
use tchat::{AssistantError, AssistantHooks, ProviderAdapter};
use tobserve::{SafeAssistantHooks, TracingObservabilityHooks};
use tprovider::SecretString;

use crate::{Orchestrator, TandemConfig};

/// Builds both adapters with tracing hooks that never propagate observer panics.
pub fn build_orchestrator(config: &TandemConfig) -> Result<Orchestrator, AssistantError> {
    build_orchestrator_with_hooks(
        config,
        Arc::new(SafeAssistantHooks::new(TracingObservabilityHooks)),
    )
}

pub fn build_orchestrator_with_hooks(
    config: &TandemConfig,
    hooks: Arc<dyn AssistantHooks>,
) -> Result<Orchestrator, AssistantError> {
    let http = Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|err| AssistantError::invalid_config(format!("http client: {err}")))?;

    let stateful = build_stateful_run_adapter(config, http.clone(), Arc::clone(&hooks))?;
    let stateless = build_stateless_adapter(config, http, Arc::clone(&hooks))?;

    Orchestrator::builder()
        .adapter(stateful)
        .adapter(stateless)
        .profiles(config.profiles.clone())
        .hooks(hooks)
        .build()
}

#[cfg(feature = "provider-assistants")]
fn build_stateful_run_adapter(
    config: &TandemConfig,
    http: Client,
    hooks: Arc<dyn AssistantHooks>,
) -> Result<Arc<dyn ProviderAdapter>, AssistantError> {
    let settings = &config.stateful_run;
    let backend = tprovider::adapters::assistants::AssistantsHttpBackend::new(
        http,
        SecretString::new(settings.api_key.expose()),
    )
    .with_base_url(settings.base_url.as_str());

    Ok(Arc::new(
        tchat::StatefulRunAdapter::new(Arc::new(backend), settings.model.as_str())
            .with_poll_policy(config.poll.clone())
            .with_hooks(hooks),
    ))
}

#[cfg(not(feature = "provider-assistants"))]
fn build_stateful_run_adapter(
    _config: &TandemConfig,
    _http: Client,
    _hooks: Arc<dyn AssistantHooks>,
) -> Result<Arc<dyn ProviderAdapter>, AssistantError> {
    Err(AssistantError::invalid_config(
        "provider-assistants feature is not enabled on tandem",
    ))
}

#[cfg(feature = "provider-mistral")]
fn build_stateless_adapter(
    config: &TandemConfig,
    http: Client,
    hooks: Arc<dyn AssistantHooks>,
) -> Result<Arc<dyn ProviderAdapter>, AssistantError> {
    let settings = &config.stateless;
    let backend = tprovider::adapters::mistral::MistralHttpBackend::new(
        http,
        SecretString::new(settings.api_key.expose()),
    )
    .with_base_url(settings.base_url.as_str());

    Ok(Arc::new(
        tchat::StatelessCompletionAdapter::new(Arc::new(backend), settings.model.as_str())
            .with_options(settings.options)
            .with_hooks(hooks),
    ))
}

#[cfg(not(feature = "provider-mistral"))]
fn build_stateless_adapter(
    _config: &TandemConfig,
    _http: Client,
    _hooks: Arc<dyn AssistantHooks>,
) -> Result<Arc<dyn ProviderAdapter>, AssistantError> {
    Err(AssistantError::invalid_config(
        "provider-mistral feature is not enabled on tandem",
    ))
}
