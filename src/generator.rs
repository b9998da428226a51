use std::sync::Arc;

use crate::{Provider, RelayError, Result, RetryingCaller, TextOutput};

/// Sends prompts to one provider through a [`RetryingCaller`].
#[derive(Clone, Debug)]
pub struct TextGenerator {
    provider: Arc<dyn Provider>,
    caller: RetryingCaller,
    system_instruction: Option<String>,
}

impl TextGenerator {
    pub fn new(provider: Arc<dyn Provider>, caller: RetryingCaller) -> Self {
        Self {
            provider,
            caller,
            system_instruction: None,
        }
    }

    /// Sets a system instruction sent along with every prompt.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn caller(&self) -> &RetryingCaller {
        &self.caller
    }

    /// Generates text for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<TextOutput> {
        let request = self
            .provider
            .build_request(prompt, self.system_instruction.as_deref())?;
        let response = self.caller.send(&request).await?;
        let body = response.bytes().await.map_err(RelayError::Transport)?;

        let output = self.provider.extract_text(&body)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            provider = self.provider.name(),
            empty = matches!(output, TextOutput::NoOutput),
            "generation finished"
        );

        Ok(output)
    }
}
