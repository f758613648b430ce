//! Process configuration read from the environment.
//!
//! ```rust
//! use std::collections::HashMap;
//! use tandem::TandemConfig;
//!
//! let env = HashMap::from([
//!     ("OPENAI_API_KEY", "sk-test"),
//!     ("MISTRAL_API_KEY", "ms-test"),
//!     ("TANDEM_POLL_MAX_WAIT_SECS", "30"),
//! ]);
//! let config = TandemConfig::from_lookup(|key| env.get(key).map(|value| value.to_string()))
//!     .expect("config should load");
//!
//! assert_eq!(config.stateless.model, "mistral-large-latest");
//! assert_eq!(config.poll.max_wait.as_secs(), 30);
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use tchat::{AssistantError, default_generation_options};
use tcommon::GenerationOptions;
use tprovider::{PollPolicy, ProviderId, SecretString};

use crate::AgentProfile;

pub const DEFAULT_ASSISTANTS_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_ASSISTANT_MODEL: &str = "gpt-4-1106-preview";
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
/// Upper bound accepted for `TANDEM_POLL_MAX_WAIT_SECS`.
pub const MAX_POLL_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug)]
pub struct RunBackendConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug)]
pub struct CompletionBackendConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub options: GenerationOptions,
}

#[derive(Debug)]
pub struct TandemConfig {
    pub stateful_run: RunBackendConfig,
    pub stateless: CompletionBackendConfig,
    pub poll: PollPolicy,
    pub request_timeout: Duration,
    pub profiles: BTreeMap<ProviderId, AgentProfile>,
}

impl TandemConfig {
    pub fn new(assistants_api_key: SecretString, mistral_api_key: SecretString) -> Self {
        Self {
            stateful_run: RunBackendConfig {
                api_key: assistants_api_key,
                base_url: DEFAULT_ASSISTANTS_BASE_URL.to_string(),
                model: DEFAULT_ASSISTANT_MODEL.to_string(),
            },
            stateless: CompletionBackendConfig {
                api_key: mistral_api_key,
                base_url: DEFAULT_MISTRAL_BASE_URL.to_string(),
                model: DEFAULT_MISTRAL_MODEL.to_string(),
                options: default_generation_options(),
            },
            poll: PollPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            profiles: ProviderId::ALL
                .into_iter()
                .map(|provider| (provider, AgentProfile::default_for(provider)))
                .collect(),
        }
    }

    pub fn from_env() -> Result<Self, AssistantError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; missing keys and unparsable
    /// numbers are `InvalidConfig`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AssistantError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            required_key(&lookup, "OPENAI_API_KEY")?,
            required_key(&lookup, "MISTRAL_API_KEY")?,
        );

        if let Some(base_url) = optional_string(&lookup, "OPENAI_BASE_URL") {
            config.stateful_run.base_url = base_url;
        }
        if let Some(model) = optional_string(&lookup, "OPENAI_ASSISTANT_MODEL") {
            config.stateful_run.model = model;
        }
        if let Some(base_url) = optional_string(&lookup, "MISTRAL_BASE_URL") {
            config.stateless.base_url = base_url;
        }
        if let Some(model) = optional_string(&lookup, "MISTRAL_MODEL") {
            config.stateless.model = model;
        }

        if let Some(millis) = optional_positive::<u64, _>(&lookup, "TANDEM_POLL_INTERVAL_MS")? {
            config.poll.initial_interval = Duration::from_millis(millis);
        }
        if let Some(millis) = optional_positive::<u64, _>(&lookup, "TANDEM_POLL_MAX_INTERVAL_MS")? {
            config.poll.max_interval = Duration::from_millis(millis);
        }
        if let Some(secs) = optional_positive::<u64, _>(&lookup, "TANDEM_POLL_MAX_WAIT_SECS")? {
            config.poll.max_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = optional_positive::<u64, _>(&lookup, "TANDEM_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }

        if config.poll.max_wait > MAX_POLL_WAIT {
            return Err(AssistantError::invalid_config(format!(
                "TANDEM_POLL_MAX_WAIT_SECS must not exceed {} seconds",
                MAX_POLL_WAIT.as_secs()
            )));
        }
        if config.poll.initial_interval > config.poll.max_interval {
            return Err(AssistantError::invalid_config(
                "TANDEM_POLL_INTERVAL_MS must not exceed TANDEM_POLL_MAX_INTERVAL_MS",
            ));
        }

        Ok(config)
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_profile(mut self, provider: ProviderId, profile: AgentProfile) -> Self {
        self.profiles.insert(provider, profile);
        self
    }
}

fn required_key<F>(lookup: &F, name: &str) -> Result<SecretString, AssistantError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)
        .ok_or_else(|| AssistantError::invalid_config(format!("{name} is not set")))?;
    SecretString::required(value, name).map_err(|error| AssistantError::invalid_config(error.message))
}

fn optional_string<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn optional_positive<T, F>(lookup: &F, name: &str) -> Result<Option<T>, AssistantError>
where
    T: FromStr + Default + PartialEq,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = optional_string(lookup, name) else {
        return Ok(None);
    };

    let value = raw.parse::<T>().map_err(|_| {
        AssistantError::invalid_config(format!("{name} must be a positive integer, got '{raw}'"))
    })?;
    if value == T::default() {
        return Err(AssistantError::invalid_config(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tchat::AssistantErrorKind;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let env = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| env.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_keys_are_set() {
        let config = TandemConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", " sk-test "),
            ("MISTRAL_API_KEY", "ms-test"),
        ]))
        .expect("config");

        assert_eq!(config.stateful_run.api_key.expose(), "sk-test");
        assert_eq!(config.stateful_run.base_url, DEFAULT_ASSISTANTS_BASE_URL);
        assert_eq!(config.stateful_run.model, DEFAULT_ASSISTANT_MODEL);
        assert_eq!(config.stateless.base_url, DEFAULT_MISTRAL_BASE_URL);
        assert_eq!(config.stateless.options.max_tokens, Some(1000));
        assert_eq!(config.poll, PollPolicy::default());
        assert_eq!(config.request_timeout, Duration::from_secs(90));
        assert_eq!(config.profiles.len(), ProviderId::ALL.len());
    }

    #[test]
    fn overrides_are_read_and_trimmed() {
        let config = TandemConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MISTRAL_API_KEY", "ms-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1 "),
            ("MISTRAL_MODEL", "mistral-small-latest"),
            ("TANDEM_POLL_INTERVAL_MS", "100"),
            ("TANDEM_POLL_MAX_INTERVAL_MS", "500"),
            ("TANDEM_POLL_MAX_WAIT_SECS", "20"),
            ("TANDEM_REQUEST_TIMEOUT_SECS", "15"),
        ]))
        .expect("config");

        assert_eq!(config.stateful_run.base_url, "http://localhost:8080/v1");
        assert_eq!(config.stateless.model, "mistral-small-latest");
        assert_eq!(config.poll.initial_interval, Duration::from_millis(100));
        assert_eq!(config.poll.max_interval, Duration::from_millis(500));
        assert_eq!(config.poll.max_wait, Duration::from_secs(20));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn missing_or_blank_keys_are_invalid_config() {
        let missing = TandemConfig::from_lookup(lookup_from(&[("MISTRAL_API_KEY", "ms")]))
            .expect_err("missing key");
        assert_eq!(missing.kind, AssistantErrorKind::InvalidConfig);
        assert!(missing.message.contains("OPENAI_API_KEY"));

        let blank = TandemConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk"),
            ("MISTRAL_API_KEY", "   "),
        ]))
        .expect_err("blank key");
        assert_eq!(blank.kind, AssistantErrorKind::InvalidConfig);
        assert!(blank.message.contains("MISTRAL_API_KEY"));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        for (name, value) in [
            ("TANDEM_POLL_MAX_WAIT_SECS", "soon"),
            ("TANDEM_POLL_MAX_WAIT_SECS", "0"),
            ("TANDEM_REQUEST_TIMEOUT_SECS", "-1"),
        ] {
            let error = TandemConfig::from_lookup(lookup_from(&[
                ("OPENAI_API_KEY", "sk"),
                ("MISTRAL_API_KEY", "ms"),
                (name, value),
            ]))
            .expect_err("invalid number");
            assert_eq!(error.kind, AssistantErrorKind::InvalidConfig);
            assert!(error.message.contains(name));
        }
    }

    #[test]
    fn oversized_max_wait_is_rejected() {
        for value in ["86401", "18446744073709551615"] {
            let error = TandemConfig::from_lookup(lookup_from(&[
                ("OPENAI_API_KEY", "sk"),
                ("MISTRAL_API_KEY", "ms"),
                ("TANDEM_POLL_MAX_WAIT_SECS", value),
            ]))
            .expect_err("max wait above cap");
            assert_eq!(error.kind, AssistantErrorKind::InvalidConfig);
            assert!(error.message.contains("TANDEM_POLL_MAX_WAIT_SECS"));
        }

        let at_cap = TandemConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk"),
            ("MISTRAL_API_KEY", "ms"),
            ("TANDEM_POLL_MAX_WAIT_SECS", "86400"),
        ]))
        .expect("cap itself is accepted");
        assert_eq!(at_cap.poll.max_wait, MAX_POLL_WAIT);
    }

    #[test]
    fn poll_interval_above_cap_is_rejected() {
        let error = TandemConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk"),
            ("MISTRAL_API_KEY", "ms"),
            ("TANDEM_POLL_INTERVAL_MS", "5000"),
        ]))
        .expect_err("interval above default cap");
        assert_eq!(error.kind, AssistantErrorKind::InvalidConfig);
    }
}
