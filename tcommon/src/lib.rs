//! Primitives shared by every tandem crate: ids, boxed futures, generation options.
//!
//! ```rust
//! use tcommon::{AgentId, GenerationOptions, ThreadId};
//!
//! let thread = ThreadId::from("thread_0a1b2c3d4e5f");
//! let agent = AgentId::new("agent_1234abcd");
//! let options = GenerationOptions::default().with_temperature(0.7).with_max_tokens(1000);
//!
//! assert_eq!(thread.as_str(), "thread_0a1b2c3d4e5f");
//! assert_eq!(agent.to_string(), "agent_1234abcd");
//! assert_eq!(options.max_tokens, Some(1000));
//! ```

pub mod future {
    //! Boxed `Send` future used at every object-safe async seam.
    //!
    //! ```rust
    //! use tcommon::{BoxFuture, ThreadId};
    //!
    //! fn lookup<'a>(thread_id: &'a ThreadId) -> BoxFuture<'a, bool> {
    //!     Box::pin(async move { !thread_id.is_blank() })
    //! }
    //!
    //! let thread_id = ThreadId::from("thread_1");
    //! let _pending = lookup(&thread_id);
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod ids {
    //! Opaque identifier newtypes shared by the backend and adapter layers.
    //!
    //! Thread ids are only meaningful inside the provider that issued them;
    //! nothing in this module ties an id to a provider, the adapters do.
    //!
    //! ```rust
    //! use tcommon::{AgentId, ThreadId};
    //!
    //! let thread = ThreadId::new("thread_abc");
    //! let agent = AgentId::from("asst_42");
    //!
    //! assert_eq!(thread.to_string(), "thread_abc");
    //! assert_eq!(agent.as_str(), "asst_42");
    //! ```

    macro_rules! opaque_id {
        ($(#[$meta:meta])* $name:ident) => {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                pub fn new(value: impl Into<String>) -> Self {
                    Self(value.into())
                }

                pub fn as_str(&self) -> &str {
                    self.0.as_str()
                }

                pub fn is_blank(&self) -> bool {
                    self.0.trim().is_empty()
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    Self(value)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }
        };
    }

    use serde::{Deserialize, Serialize};

    opaque_id!(
        /// Caller-visible conversation id, issued by one provider adapter.
        ThreadId
    );

    opaque_id!(
        /// Backend-side assistant id returned by agent creation.
        AgentId
    );
}

pub mod model {
    //! Shared generation settings for completion-style backends.
    //!
    //! ```rust
    //! use tcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128);
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_tokens, Some(128));
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }
    }
}

pub mod registry {
    //! Keyed lookup table; the orchestrator keeps one adapter per provider in it.
    //!
    //! ```rust
    //! use tcommon::{Registry, ThreadId};
    //!
    //! let mut owners = Registry::new();
    //! owners.insert(ThreadId::from("thread_a"), "stateless");
    //! let replaced = owners.insert(ThreadId::from("thread_a"), "stateful-run");
    //!
    //! assert_eq!(replaced, Some("stateless"));
    //! assert_eq!(owners.get(&ThreadId::from("thread_a")), Some(&"stateful-run"));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
            self.items.iter()
        }
    }
}

pub use future::BoxFuture;
pub use ids::{AgentId, ThreadId};
pub use model::GenerationOptions;
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use super::{AgentId, GenerationOptions, Registry, ThreadId};

    #[test]
    fn id_newtypes_round_trip_strings() {
        let thread = ThreadId::new("thread-1");
        let agent = AgentId::from("agent-1");

        assert_eq!(thread.as_str(), "thread-1");
        assert_eq!(agent.as_str(), "agent-1");
        assert_eq!(thread.to_string(), "thread-1");
        assert_eq!(agent.to_string(), "agent-1");
    }

    #[test]
    fn thread_id_blank_detection_ignores_whitespace() {
        assert!(ThreadId::from("   ").is_blank());
        assert!(ThreadId::from("").is_blank());
        assert!(!ThreadId::from("thread_1").is_blank());
    }

    #[test]
    fn id_newtypes_serialize_as_plain_strings() {
        let encoded = serde_json::to_string(&ThreadId::from("thread_9")).expect("encode");
        assert_eq!(encoded, "\"thread_9\"");

        let decoded: AgentId = serde_json::from_str("\"asst_1\"").expect("decode");
        assert_eq!(decoded, AgentId::from("asst_1"));
    }

    #[test]
    fn generation_options_builder_helpers_set_values() {
        let options = GenerationOptions::default()
            .with_temperature(0.3)
            .with_max_tokens(123);

        assert_eq!(options.temperature, Some(0.3));
        assert_eq!(options.max_tokens, Some(123));
    }

    #[test]
    fn registry_lookups_borrow_string_keys() {
        let mut models: Registry<String, u32> = Registry::new();

        models.insert("mistral-large-latest".to_string(), 1000);
        models.insert("mistral-small-latest".to_string(), 500);

        assert_eq!(models.get("mistral-small-latest"), Some(&500));
        assert!(!models.contains_key("gpt-4-1106-preview"));
        assert_eq!(models.iter().map(|(_, limit)| limit).sum::<u32>(), 1500);
    }
}
