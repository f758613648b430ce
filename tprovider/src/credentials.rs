//! Redacted in-memory API key holder.
//!
//! ```rust
//! use tprovider::SecretString;
//!
//! let key = SecretString::new("sk-live-123");
//! assert_eq!(format!("{key:?}"), "[REDACTED]");
//! assert_eq!(key.expose(), "sk-live-123");
//! ```

use crate::ProviderError;

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Trims the key and rejects it when nothing is left.
    pub fn required(value: impl Into<String>, label: &str) -> Result<Self, ProviderError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::authentication(format!(
                "{label} must not be empty"
            )));
        }

        Ok(Self::new(trimmed))
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8, so the string stays well formed.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn required_trims_and_rejects_blank_keys() {
        let key = SecretString::required("  sk-abc  ", "OpenAI API key").expect("key");
        assert_eq!(key.expose(), "sk-abc");

        let error = SecretString::required("   ", "Mistral API key").expect_err("blank key");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
        assert!(error.message.contains("Mistral API key"));
    }
}
