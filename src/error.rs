// src/error.rs

use std::fmt;

/// Client-wide error enum.
/// Every API call and config load funnels its failures through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    // Read path failed (non-2xx or no response); carries the static message
    Network(String),

    // Write path got a non-2xx response
    Rejected { status: u16, message: String },

    // Write path never got a response
    Transport(String),

    // Bad environment / base URL
    Config(String),

    // Refused locally, nothing was sent
    Invalid(String),
}

impl ClientError {
    /// Text for the blocking notification shown to the user.
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Network(msg)
            | ClientError::Transport(msg)
            | ClientError::Config(msg)
            | ClientError::Invalid(msg) => msg,
            ClientError::Rejected { message, .. } => message,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "network error: {}", msg),
            ClientError::Rejected { status, message } => {
                write!(f, "request rejected ({}): {}", status, message)
            }
            ClientError::Transport(msg) => write!(f, "transport error: {}", msg),
            ClientError::Config(msg) => write!(f, "configuration error: {}", msg),
            ClientError::Invalid(msg) => write!(f, "invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Converts `reqwest::Error` into `ClientError::Transport`.
/// Allows using `?` on `send()` inside the write paths.
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Invalid(err.to_string())
    }
}
