use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("server returned {status}: {message}")]
    Server {
        status: u16,
        message: String,
        trace_id: Option<String>,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Rejected locally before anything was sent.
    #[error(transparent)]
    Core(#[from] nyaya_core::CoreError),
}

impl ClientError {
    /// Transport failures and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Server { status, .. } => *status >= 500,
            Self::Json(_) | Self::Core(_) => false,
        }
    }

    /// Trace id the backend attached to an error response.
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::Server { trace_id, .. } => trace_id.as_deref(),
            _ => None,
        }
    }
}
