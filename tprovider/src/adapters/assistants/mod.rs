mod serde_api;
mod tests;
mod transport;

pub use transport::{AssistantsHttpBackend, DEFAULT_BASE_URL};
