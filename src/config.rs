use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::{
    provider::{
        GeminiProvider, OpenAiChatProvider, Provider, DEFAULT_GEMINI_BASE_URL,
        DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
    },
    RelayError, Result,
};

pub const DEFAULT_RELAY_ADDR: &str = "127.0.0.1:3000";

/// Which upstream API flavour to talk to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl ProviderKind {
    /// Environment variable holding this provider's credential.
    pub fn credential_var(self) -> &'static str {
        match self {
            Self::Gemini => "GOOGLE_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Reads `PROMPTRELAY_PROVIDER`, defaulting to Gemini.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("PROMPTRELAY_PROVIDER") {
            Some(value) => Self::parse(&value),
            None => Ok(Self::default()),
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            other => Err(RelayError::Config(format!(
                "unknown PROMPTRELAY_PROVIDER '{other}' (expected 'gemini' or 'openai')"
            ))),
        }
    }
}

/// Credentials and endpoint settings for one provider.
#[derive(Clone, Eq, PartialEq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderConfig {
    /// Reads provider settings from the process environment.
    ///
    /// Reads:
    /// - `PROMPTRELAY_PROVIDER` — `gemini` (default) or `openai`
    /// - `GOOGLE_API_KEY`, `GEMINI_MODEL`, `GEMINI_BASE_URL` for Gemini
    /// - `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL` for OpenAI
    ///
    /// Returns [`RelayError::Config`] if the credential is missing or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ProviderConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = ProviderKind::from_lookup(&lookup)?;
        let (model_var, base_var, default_model, default_base) = match kind {
            ProviderKind::Gemini => (
                "GEMINI_MODEL",
                "GEMINI_BASE_URL",
                DEFAULT_GEMINI_MODEL,
                DEFAULT_GEMINI_BASE_URL,
            ),
            ProviderKind::OpenAi => (
                "OPENAI_MODEL",
                "OPENAI_BASE_URL",
                DEFAULT_OPENAI_MODEL,
                DEFAULT_OPENAI_BASE_URL,
            ),
        };

        let key_var = kind.credential_var();
        let api_key = lookup(key_var)
            .ok_or_else(|| RelayError::Config(format!("missing {key_var} environment variable")))?;
        if api_key.trim().is_empty() {
            return Err(RelayError::Config(format!("{key_var} is set but empty")));
        }

        Ok(Self {
            kind,
            api_key,
            model: non_blank(lookup(model_var)).unwrap_or_else(|| default_model.to_owned()),
            base_url: non_blank(lookup(base_var)).unwrap_or_else(|| default_base.to_owned()),
        })
    }

    pub fn build_provider(&self) -> Arc<dyn Provider> {
        match self.kind {
            ProviderKind::Gemini => Arc::new(
                GeminiProvider::new(self.api_key.clone())
                    .with_model(self.model.clone())
                    .with_base_url(self.base_url.clone()),
            ),
            ProviderKind::OpenAi => Arc::new(
                OpenAiChatProvider::new(self.api_key.clone())
                    .with_model(self.model.clone())
                    .with_base_url(self.base_url.clone()),
            ),
        }
    }
}

/// Settings for the relay binary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Attempts per upstream call; 1 keeps the relay single-shot.
    pub max_attempts: usize,
}

impl ServerConfig {
    /// Reads `PROMPTRELAY_ADDR` and `PROMPTRELAY_RETRIES`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = non_blank(lookup("PROMPTRELAY_ADDR"))
            .unwrap_or_else(|| DEFAULT_RELAY_ADDR.to_owned());
        let addr = addr.trim().parse().map_err(|err| {
            RelayError::Config(format!("invalid PROMPTRELAY_ADDR '{addr}': {err}"))
        })?;

        let max_attempts = match non_blank(lookup("PROMPTRELAY_RETRIES")) {
            Some(value) => value.trim().parse::<usize>().map_err(|err| {
                RelayError::Config(format!("invalid PROMPTRELAY_RETRIES '{value}': {err}"))
            })?,
            None => 1,
        };
        if max_attempts == 0 {
            return Err(RelayError::Config(
                "PROMPTRELAY_RETRIES must be at least 1".to_owned(),
            ));
        }

        Ok(Self { addr, max_attempts })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
