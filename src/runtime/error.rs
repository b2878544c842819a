//! Error model shared by every generated client method.

/// A non-success HTTP response, decoded as far as the server allows.
///
/// Transport failures never end up here; they stay as
/// [`Error::Transport`] so callers can always tell "the server said no"
/// apart from "the server was unreachable".
#[derive(Debug, thiserror::Error)]
#[error("HTTP {status_code}: {message}")]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Best-effort human-readable message extracted from the body.
    pub message: String,
    body: Vec<u8>,
}

impl ApiError {
    /// Build an error from a response's status and raw body.
    ///
    /// The message comes from the body's JSON `message` or `error` field
    /// when present, otherwise from the body text itself (truncated), and
    /// falls back to the bare status code for empty bodies.
    pub fn from_response(status_code: u16, body: Vec<u8>) -> Self {
        let message = extract_message(&body)
            .unwrap_or_else(|| format!("HTTP {status_code}"));
        Self {
            status_code,
            message,
            body,
        }
    }

    /// The raw response body, available for programmatic handling even
    /// when it did not parse as a structured error.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

const MESSAGE_PREVIEW_LIMIT: usize = 200;

fn extract_message(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let preview: String = trimmed.chars().take(MESSAGE_PREVIEW_LIMIT).collect();
    Some(preview)
}

/// Everything a generated client method can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server responded with a status outside the operation's declared
    /// success set.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The exchange never completed: connection refused, DNS failure,
    /// timeout, or a broken response stream.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A path template placeholder was left unfilled. Raised before any
    /// request is sent.
    #[error("missing path parameter `{name}`")]
    MissingPathParameter {
        /// The placeholder's name.
        name: String,
    },

    /// A request body or response value failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The base URL handed to the client could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A header name or value was not valid HTTP.
    #[error("invalid header `{name}`")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

impl Error {
    /// The API error, if the server answered with a non-success status.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}
