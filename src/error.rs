use thiserror::Error;

/// Errors from the I/O side of the assistant: the live chat call, the
/// response cache and configuration. Parsing never produces one of these.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Transport failure while talking to the assistant
    #[error("Failed to reach assistant: {0}")]
    Http(#[from] reqwest::Error),

    /// The assistant answered with a non-2xx status
    #[error("Bad response: {status}{}", api_detail(.message))]
    BadResponse {
        status: u16,
        message: Option<String>,
    },

    /// The assistant answered 2xx but without any message content
    #[error("No response from assistant")]
    EmptyCompletion,

    /// A response body or cache file could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The cache store rejected a read or write
    #[error("Cache error: {0}")]
    Cache(String),

    /// File-backed store I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cache write needs a signed-in user
    #[error("No user is currently signed in")]
    NotAuthenticated,

    /// The prompt was blank after normalization
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// No API key in configuration or environment
    #[error("OPENAI_API_KEY not found in config or environment")]
    MissingApiKey,

    /// Session builder misuse
    #[error("Builder error: {0}")]
    Builder(String),

    /// The session was closed before the call was made
    #[error("Session is closed")]
    SessionClosed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

fn api_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(",\n{m}"))
        .unwrap_or_default()
}
