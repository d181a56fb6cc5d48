//! Errors raised by the transport client.

/// Errors returned by [`HttpClient`](crate::http::HttpClient).
///
/// `Timeout` and `Configuration` end the operation on the spot. `Http`,
/// `Transport` and `Decode` are retried until the retry budget runs out.
#[derive(Debug)]
pub enum ClientError {
    /// Invalid client or request setup (missing API key, zero timeout, bad header)
    Configuration(String),
    /// An attempt did not finish within its deadline
    Timeout { timeout_ms: u64 },
    /// The server answered with a non-2xx status
    Http { status: u16, message: String },
    /// The request never produced a response (connection, DNS, body read)
    Transport(anyhow::Error),
    /// A 2xx body was not the expected JSON
    Decode(serde_json::Error),
    /// The request payload could not be serialized
    Serialize(serde_json::Error),
}

impl ClientError {
    /// Whether another attempt may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Http { .. } | ClientError::Transport(_) | ClientError::Decode(_)
        )
    }

    /// HTTP status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Configuration(msg) => write!(f, "{}", msg),
            ClientError::Timeout { timeout_ms } => {
                write!(f, "Request timeout after {}ms", timeout_ms)
            }
            ClientError::Http { message, .. } => write!(f, "{}", message),
            // Alternate form keeps the whole context chain on one line
            ClientError::Transport(err) => write!(f, "{:#}", err),
            ClientError::Decode(err) => write!(f, "Failed to parse JSON response: {}", err),
            ClientError::Serialize(err) => {
                write!(f, "Failed to serialize request body: {}", err)
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(err) => Some(&**err),
            ClientError::Decode(err) | ClientError::Serialize(err) => Some(err),
            _ => None,
        }
    }
}
