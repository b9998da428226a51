/// Text extracted from a provider response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextOutput {
    Text(String),
    /// The upstream answered successfully but produced no text.
    NoOutput,
}

impl TextOutput {
    /// Placeholder shown to end users when nothing was generated.
    pub const NO_OUTPUT_PLACEHOLDER: &'static str = "(no output)";

    pub(crate) fn from_text(text: String) -> Self {
        if text.is_empty() {
            Self::NoOutput
        } else {
            Self::Text(text)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NoOutput => None,
        }
    }

    /// Returns the text, or [`TextOutput::NO_OUTPUT_PLACEHOLDER`].
    pub fn into_display_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::NoOutput => Self::NO_OUTPUT_PLACEHOLDER.to_owned(),
        }
    }
}
