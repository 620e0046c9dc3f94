use std::time::Duration;

/// Prompt printed before every new line.
pub const DEFAULT_PROMPT: &str = "> ";

/// How long to wait for the rest of an escape sequence.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(10);

/// Settings that shape how a [`Session`](crate::Session) talks to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Text written before each line of input.
    pub prompt: String,
    /// Upper bound on the lookahead used to recognise arrow-key sequences.
    pub escape_timeout: Duration,
    /// Echo unrecognised control bytes as `{0xHH}` instead of dropping them silently.
    pub show_unknown_codes: bool,
}

impl EditorConfig {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.escape_timeout = timeout;
        self
    }

    pub fn with_unknown_codes_shown(mut self, show: bool) -> Self {
        self.show_unknown_codes = show;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            show_unknown_codes: false,
        }
    }
}
