use std::time::Duration;

use nyaya_core::trace::DEFAULT_TRACE_PREFIX;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Connection settings for [`NyayaClient`](crate::NyayaClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Like `http://localhost:8000`. A trailing slash is trimmed.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra attempts for idempotent GETs after a transport failure or 5xx.
    pub max_retries: u32,
    /// Delay before retry `n` is `retry_backoff * n`.
    pub retry_backoff: Duration,
    pub trace_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            trace_prefix: DEFAULT_TRACE_PREFIX.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
