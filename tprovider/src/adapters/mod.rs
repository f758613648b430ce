#[cfg(any(feature = "provider-assistants", feature = "provider-mistral"))]
mod http;

#[cfg(feature = "provider-assistants")]
pub mod assistants;

#[cfg(feature = "provider-mistral")]
pub mod mistral;
