//! `promptrelay` calls generative-text HTTP APIs with bounded exponential
//! backoff and relays prompts to them over HTTP.
//!
//! - [`RetryingCaller::send`] retries `429` responses and transport failures
//!   with `base * 2^attempt + jitter` delays.
//! - [`TextGenerator::generate`] shapes a prompt for a [`Provider`] and
//!   extracts the generated text.
//! - `relay::router` (feature `server`) serves `POST /api/generate`.

mod backoff;
mod caller;
mod config;
mod error;
mod generator;
mod options;
mod provider;
mod request;
mod types;
mod wire;

#[cfg(feature = "server")]
pub mod relay;

pub use backoff::{backoff_delay, Sleeper, TokioSleeper};
pub use caller::RetryingCaller;
pub use config::{ProviderConfig, ProviderKind, ServerConfig, DEFAULT_RELAY_ADDR};
pub use error::RelayError;
pub use generator::TextGenerator;
pub use options::RetryOptions;
pub use provider::{
    GeminiProvider, OpenAiChatProvider, Provider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};
pub use request::UpstreamRequest;
pub use types::TextOutput;

pub type Result<T> = std::result::Result<T, RelayError>;
