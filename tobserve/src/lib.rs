//! Observability hooks for adapter sends, run polling, and initialization.
//!
//! ```rust
//! use tobserve::{MetricsObservabilityHooks, SafeAssistantHooks, TracingObservabilityHooks};
//!
//! let _hooks = SafeAssistantHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeAssistantHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{MetricsObservabilityHooks, SafeAssistantHooks, TracingObservabilityHooks};
}

#[cfg(test)]
mod tests;
