use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

use crate::{
    wire::{
        ChatMessage, ChatRequest, ChatResponse, GeminiContent, GeminiRequest, GeminiResponse,
    },
    RelayError, Result, TextOutput, UpstreamRequest,
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

const GOOG_API_KEY: &str = "x-goog-api-key";

/// A generative-text API flavour: how to shape a prompt into a request and
/// how to pull the generated text back out of the response body.
pub trait Provider: fmt::Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn build_request(&self, prompt: &str, system_instruction: Option<&str>)
        -> Result<UpstreamRequest>;

    /// Maps a successful response body to its text.
    fn extract_text(&self, body: &[u8]) -> Result<TextOutput>;
}

/// Google Gemini `generateContent`.
#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            model: DEFAULT_GEMINI_MODEL.to_owned(),
            api_key: api_key.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Endpoint for the configured model.
    ///
    /// Example: `https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.trim()
        )
    }
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn build_request(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<UpstreamRequest> {
        let payload = GeminiRequest {
            contents: vec![GeminiContent::text(prompt)],
            system_instruction: system_instruction.map(GeminiContent::text),
        };
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(GOOG_API_KEY), sensitive_header(&self.api_key)?);
        Ok(UpstreamRequest::post_json(self.endpoint(), to_json(&payload)?).with_headers(headers))
    }

    fn extract_text(&self, body: &[u8]) -> Result<TextOutput> {
        let response: GeminiResponse = decode(body)?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        Ok(TextOutput::from_text(text))
    }
}

/// OpenAI-compatible `/v1/chat/completions`.
#[derive(Clone)]
pub struct OpenAiChatProvider {
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiChatProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_owned(),
            model: DEFAULT_OPENAI_MODEL.to_owned(),
            api_key: api_key.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpenAiChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChatProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Provider for OpenAiChatProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn build_request(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<UpstreamRequest> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_instruction {
            messages.push(ChatMessage {
                role: "system".to_owned(),
                content: Some(system.to_owned()),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_owned(),
            content: Some(prompt.to_owned()),
        });
        let payload = ChatRequest {
            model: self.model.clone(),
            messages,
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            sensitive_header(&normalize_bearer_authorization(&self.api_key))?,
        );
        Ok(UpstreamRequest::post_json(self.endpoint(), to_json(&payload)?).with_headers(headers))
    }

    fn extract_text(&self, body: &[u8]) -> Result<TextOutput> {
        let response: ChatResponse = decode(body)?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();
        Ok(TextOutput::from_text(text))
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| {
        RelayError::Decode(format!(
            "invalid upstream response JSON: {err}; body: {}",
            String::from_utf8_lossy(body)
        ))
    })
}

fn to_json<T: serde::Serialize>(payload: &T) -> Result<serde_json::Value> {
    serde_json::to_value(payload)
        .map_err(|err| RelayError::Config(format!("could not encode request payload: {err}")))
}

fn sensitive_header(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value.trim())
        .map_err(|_| RelayError::Config("credential contains invalid header characters".to_owned()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
