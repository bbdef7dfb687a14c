//! The legal-analysis backend as seen by the client.

use async_trait::async_trait;
use nyaya_core::feedback::{FeedbackRejection, validate_feedback};
use nyaya_core::{
    CaseQuery, Domain, ExplainReasoningRequest, FeedbackRequest, Jurisdiction,
    MultiJurisdictionRequest, QueryRequest,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::ClientError;

/// A successful backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub data: Value,
    /// `trace_id` from the response body, else the id this client sent.
    pub trace_id: Option<String>,
}

impl ApiReply {
    pub fn new(data: Value, sent_trace_id: Option<String>) -> Self {
        let trace_id = data
            .get("trace_id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or(sent_trace_id);
        Self { data, trace_id }
    }
}

/// Result of offering a feedback signal.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackOutcome {
    Sent(ApiReply),
    /// Rejected locally; nothing was sent.
    Skipped(FeedbackRejection),
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Raw payload for one case-presentation domain. Normalise before use.
    async fn fetch_domain(&self, domain: Domain, query: &CaseQuery) -> Result<Value, ClientError>;

    /// `POST /nyaya/query`: single-jurisdiction analysis.
    async fn submit_query(&self, request: &QueryRequest) -> Result<ApiReply, ClientError>;

    /// `POST /nyaya/multi_jurisdiction`: one analysis per jurisdiction.
    async fn submit_multi_jurisdiction(
        &self,
        request: &MultiJurisdictionRequest,
    ) -> Result<ApiReply, ClientError>;

    /// `POST /nyaya/explain_reasoning` for an earlier trace.
    async fn explain_reasoning(
        &self,
        request: &ExplainReasoningRequest,
    ) -> Result<ApiReply, ClientError>;

    /// `POST /nyaya/feedback`. Prefer [`Self::submit_feedback_signal`], which
    /// validates first.
    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<ApiReply, ClientError>;

    /// `GET /nyaya/trace/{id}`: the audit trail behind a response.
    async fn get_trace(&self, trace_id: &str) -> Result<ApiReply, ClientError>;

    /// `GET /nyaya/jurisdiction_info`, optionally for one jurisdiction.
    async fn jurisdiction_info(
        &self,
        jurisdiction: Option<Jurisdiction>,
    ) -> Result<ApiReply, ClientError>;

    /// `GET /health`.
    async fn health(&self) -> Result<ApiReply, ClientError>;

    /// Validate a yes/no feedback signal and send it only if it passes.
    async fn submit_feedback_signal(
        &self,
        trace_id: &str,
        feedback_type: &str,
        value: &Value,
        context: &str,
    ) -> Result<FeedbackOutcome, ClientError> {
        let request = match validate_feedback(trace_id, feedback_type, value, context) {
            Ok(request) => request,
            Err(rejection) => {
                match &rejection {
                    FeedbackRejection::MissingTraceId | FeedbackRejection::MockTraceId(_) => {
                        info!(reason = %rejection, "skipping feedback submission (demo mode)")
                    }
                    _ => warn!(reason = %rejection, "rejected feedback signal"),
                }
                return Ok(FeedbackOutcome::Skipped(rejection));
            }
        };
        let reply = self.submit_feedback(&request).await?;
        info!(
            trace_id = %request.trace_id,
            feedback_type = %request.feedback_type,
            rating = request.rating,
            "feedback submitted"
        );
        Ok(FeedbackOutcome::Sent(reply))
    }
}
