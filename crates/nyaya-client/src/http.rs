//! HTTP client for the Nyaya legal-analysis backend.

use async_trait::async_trait;
use nyaya_core::trace::generate_trace_id;
use nyaya_core::{
    CaseQuery, CoreError, Domain, ExplainReasoningRequest, FeedbackRequest, Jurisdiction,
    MultiJurisdictionRequest, QueryRequest,
};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::backend::{ApiReply, Backend};
use crate::{ClientConfig, ClientError};

/// Correlation header carried by every request.
pub const TRACE_HEADER: &str = "X-Trace-ID";

/// HTTP client for the backend's `/nyaya/*` endpoints.
pub struct NyayaClient {
    client: reqwest::Client,
    base_url: String,
    config: ClientConfig,
}

impl NyayaClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with retry on transport failures and 5xx. The same trace id is
    /// reused across attempts.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<ApiReply, ClientError> {
        self.get_url(self.url(path), params).await
    }

    async fn get_url(
        &self,
        url: String,
        params: &[(&str, String)],
    ) -> Result<ApiReply, ClientError> {
        let trace_id = generate_trace_id(&self.config.trace_prefix);
        let mut attempt = 0u32;
        loop {
            let request = self
                .client
                .get(&url)
                .query(params)
                .header(TRACE_HEADER, &trace_id);
            match self.send(request, &url, &trace_id).await {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        url = %url,
                        trace_id = %trace_id,
                        attempt,
                        error = %e,
                        "retrying request"
                    );
                    tokio::time::sleep(self.config.retry_backoff * attempt).await;
                }
                result => return result,
            }
        }
    }

    /// `/nyaya/trace/<id>` with the id encoded as a single path segment.
    fn trace_url(&self, trace_id: &str) -> Result<String, ClientError> {
        if matches!(trace_id.trim(), "" | "." | "..") {
            return Err(CoreError::InvalidRequest(format!("invalid trace id '{trace_id}'")).into());
        }
        let base = self.url("/nyaya/trace");
        let mut url = Url::parse(&base)
            .map_err(|e| CoreError::InvalidRequest(format!("invalid base url '{base}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CoreError::InvalidRequest(format!("base url '{base}' has no path")))?
            .push(trace_id);
        Ok(url.into())
    }

    /// POST, sent once.
    async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiReply, ClientError> {
        let url = self.url(path);
        let trace_id = generate_trace_id(&self.config.trace_prefix);
        let request = self
            .client
            .post(&url)
            .header(TRACE_HEADER, &trace_id)
            .json(body);
        self.send(request, &url, &trace_id).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
        trace_id: &str,
    ) -> Result<ApiReply, ClientError> {
        info!(url = %url, trace_id = %trace_id, "sending request");
        let resp = request.send().await.map_err(|e| timeout_or(e, url))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(server_error(status.as_u16(), &body));
        }

        let bytes = resp.bytes().await.map_err(|e| timeout_or(e, url))?;
        let data: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        info!(url = %url, status = status.as_u16(), "request complete");
        Ok(ApiReply::new(data, Some(trace_id.to_string())))
    }
}

fn timeout_or(e: reqwest::Error, url: &str) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout {
            url: url.to_string(),
        }
    } else {
        ClientError::Http(e)
    }
}

/// Build a `Server` error, taking `message` (or FastAPI's `detail`) and
/// `trace_id` from a JSON body when there is one.
fn server_error(status: u16, body: &str) -> ClientError {
    let json: Option<Value> = serde_json::from_str(body).ok();
    let field = |key: &str| {
        json.as_ref()
            .and_then(|j| j.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    let message = field("message")
        .or_else(|| field("detail"))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("API request failed with status {status}")
            } else {
                body.to_string()
            }
        });
    ClientError::Server {
        status,
        message,
        trace_id: field("trace_id"),
    }
}

#[async_trait]
impl Backend for NyayaClient {
    async fn fetch_domain(&self, domain: Domain, query: &CaseQuery) -> Result<Value, ClientError> {
        let reply = self.get(domain.endpoint(), &query.params()).await?;
        Ok(reply.data)
    }

    async fn submit_query(&self, request: &QueryRequest) -> Result<ApiReply, ClientError> {
        self.post("/nyaya/query", request).await
    }

    async fn submit_multi_jurisdiction(
        &self,
        request: &MultiJurisdictionRequest,
    ) -> Result<ApiReply, ClientError> {
        self.post("/nyaya/multi_jurisdiction", request).await
    }

    async fn explain_reasoning(
        &self,
        request: &ExplainReasoningRequest,
    ) -> Result<ApiReply, ClientError> {
        self.post("/nyaya/explain_reasoning", request).await
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<ApiReply, ClientError> {
        self.post("/nyaya/feedback", request).await
    }

    async fn get_trace(&self, trace_id: &str) -> Result<ApiReply, ClientError> {
        let url = self.trace_url(trace_id)?;
        self.get_url(url, &[]).await
    }

    async fn jurisdiction_info(
        &self,
        jurisdiction: Option<Jurisdiction>,
    ) -> Result<ApiReply, ClientError> {
        let params: Vec<(&str, String)> = jurisdiction
            .map(|j| vec![("jurisdiction", j.as_str().to_string())])
            .unwrap_or_default();
        self.get("/nyaya/jurisdiction_info", &params).await
    }

    async fn health(&self) -> Result<ApiReply, ClientError> {
        self.get("/health", &[]).await
    }
}
