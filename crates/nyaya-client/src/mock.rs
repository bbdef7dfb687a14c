//! Demo backend returning canned analysis.
//!
//! Stands in for the real service when it is unreachable or for offline
//! demos. Every trace id it hands out carries the mock sentinel, so feedback
//! on mock responses is never forwarded anywhere.

use std::collections::HashSet;

use async_trait::async_trait;
use nyaya_core::trace::generate_mock_trace_id;
use nyaya_core::{
    CaseQuery, Domain, ExplainReasoningRequest, FeedbackRequest, Jurisdiction,
    MultiJurisdictionRequest, QueryRequest,
};
use serde_json::{Value, json};

use crate::ClientError;
use crate::backend::{ApiReply, Backend};

const GLOSSARY: &[(&str, &str, Jurisdiction)] = &[
    (
        "Breach of Contract",
        "Violation of any term or condition of a contract without lawful excuse",
        Jurisdiction::India,
    ),
    (
        "Force Majeure",
        "A clause that frees parties from liability when extraordinary events occur",
        Jurisdiction::India,
    ),
    (
        "Specific Performance",
        "Court-ordered remedy requiring a party to perform contractual obligations",
        Jurisdiction::India,
    ),
    (
        "Limitation Period",
        "Maximum time period to initiate legal action after cause of action arises",
        Jurisdiction::India,
    ),
    (
        "Arbitration",
        "Binding dispute resolution through private arbitration tribunal",
        Jurisdiction::India,
    ),
    (
        "Tort",
        "Civil wrong that causes harm or loss to another person",
        Jurisdiction::Uk,
    ),
    (
        "Injunction",
        "Court order requiring a party to do or refrain from doing specific acts",
        Jurisdiction::Uk,
    ),
    (
        "Damages",
        "Monetary compensation awarded for loss or injury",
        Jurisdiction::Uae,
    ),
];

/// Canned backend. Domains listed in `failing` return a server error, which
/// is useful for exercising partial degradation.
#[derive(Debug, Default, Clone)]
pub struct MockBackend {
    failing: HashSet<Domain>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, domain: Domain) -> Self {
        self.failing.insert(domain);
        self
    }

    fn reply(data: Value) -> Result<ApiReply, ClientError> {
        Ok(ApiReply::new(data, None))
    }

    fn analysis(query: &str, jurisdiction: Jurisdiction, trace_id: &str) -> Value {
        let articles: Vec<&str> = if jurisdiction == Jurisdiction::India {
            vec!["Article 14", "Article 21"]
        } else {
            vec![]
        };
        json!({
            "domain": "civil",
            "jurisdiction": jurisdiction.as_str(),
            "confidence": 0.85,
            "legal_route": [
                "jurisdiction_router_agent",
                format!("{}_legal_agent", jurisdiction.as_str().to_lowercase()),
            ],
            "constitutional_articles": articles,
            "query": query,
            "trace_id": trace_id,
            "enforcement_status": {"state": "clear", "trace_id": trace_id},
        })
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_domain(&self, domain: Domain, query: &CaseQuery) -> Result<Value, ClientError> {
        if self.failing.contains(&domain) {
            return Err(ClientError::Server {
                status: 503,
                message: format!("mock {domain} unavailable"),
                trace_id: None,
            });
        }
        let jurisdiction = query.jurisdiction.unwrap_or_default();
        let case_id = query.case_id.clone().unwrap_or_else(|| "DEMO-001".into());
        let data = match domain {
            Domain::CaseSummary => json!({
                "caseId": case_id,
                "title": "Security deposit dispute",
                "overview": "Tenant seeks a withheld security deposit after the lease ended.",
                "keyFacts": [
                    "Lease ended on schedule",
                    "Deposit of two months' rent withheld",
                    "No inspection report provided"
                ],
                "jurisdiction": jurisdiction.as_str(),
                "confidence": 0.85,
                "status": "open",
                "parties": {"claimant": "Tenant", "respondent": "Landlord"},
            }),
            Domain::LegalRoutes => json!({
                "routes": [
                    {
                        "name": "Mediation",
                        "description": "Facilitated negotiation with a neutral mediator",
                        "recommendation": "Try first; cheapest and fastest",
                        "suitability": 0.9,
                        "estimatedDuration": "1-2 months",
                        "pros": ["Low cost", "Preserves relationship"],
                        "cons": ["Not binding unless settled"]
                    },
                    {
                        "name": "Civil Suit",
                        "description": "Recovery suit before the competent civil court",
                        "suitability": 0.6,
                        "estimatedDuration": "12-24 months",
                        "estimatedCost": "Moderate",
                        "pros": ["Binding decree"],
                        "cons": ["Slow", "Court fees"]
                    }
                ],
                "jurisdiction": jurisdiction.as_str(),
                "caseType": "civil",
            }),
            Domain::Timeline => json!({
                "events": [
                    {"title": "Lease ended", "type": "milestone", "status": "completed"},
                    {"title": "Send legal notice", "type": "step", "status": "pending"},
                    {"title": "Limitation period expires", "type": "deadline", "status": "pending"}
                ],
                "jurisdiction": jurisdiction.as_str(),
                "caseId": case_id,
            }),
            Domain::Glossary => {
                let terms: Vec<Value> = GLOSSARY
                    .iter()
                    .filter(|(_, _, j)| *j == jurisdiction)
                    .map(|(term, definition, j)| {
                        json!({"term": term, "definition": definition, "jurisdiction": j.as_str()})
                    })
                    .collect();
                json!({"terms": terms, "jurisdiction": jurisdiction.as_str(), "caseType": "civil"})
            }
            Domain::EnforcementStatus => json!({
                "state": "clear",
                "reason": "No enforcement restrictions apply",
                "trace_id": generate_mock_trace_id(),
            }),
        };
        Ok(data)
    }

    async fn submit_query(&self, request: &QueryRequest) -> Result<ApiReply, ClientError> {
        let trace_id = generate_mock_trace_id();
        Self::reply(Self::analysis(
            &request.query,
            request.jurisdiction_hint,
            &trace_id,
        ))
    }

    async fn submit_multi_jurisdiction(
        &self,
        request: &MultiJurisdictionRequest,
    ) -> Result<ApiReply, ClientError> {
        let trace_id = generate_mock_trace_id();
        let analysis: serde_json::Map<String, Value> = request
            .jurisdictions
            .iter()
            .map(|j| {
                (
                    j.as_str().to_string(),
                    Self::analysis(&request.query, *j, &trace_id),
                )
            })
            .collect();
        Self::reply(json!({
            "comparative_analysis": analysis,
            "confidence": 0.8,
            "trace_id": trace_id,
        }))
    }

    async fn explain_reasoning(
        &self,
        request: &ExplainReasoningRequest,
    ) -> Result<ApiReply, ClientError> {
        Self::reply(json!({
            "trace_id": request.trace_id,
            "explanation": {
                "level": request.explanation_level,
                "summary": "Demo explanation: routed by jurisdiction hint, then by domain keywords."
            },
            "reasoning_tree": {"root": "jurisdiction_router_agent"},
            "constitutional_articles": [],
        }))
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<ApiReply, ClientError> {
        Self::reply(json!({
            "status": "recorded",
            "trace_id": request.trace_id,
            "message": "Feedback recorded (demo mode)",
        }))
    }

    async fn get_trace(&self, trace_id: &str) -> Result<ApiReply, ClientError> {
        Self::reply(json!({
            "trace_id": trace_id,
            "event_chain": [],
            "agent_routing_tree": {},
            "jurisdiction_hops": [],
            "rl_reward_snapshot": {},
            "context_fingerprint": "",
            "nonce_verification": false,
            "signature_verification": false,
        }))
    }

    async fn jurisdiction_info(
        &self,
        jurisdiction: Option<Jurisdiction>,
    ) -> Result<ApiReply, ClientError> {
        let j = jurisdiction.unwrap_or_default();
        Self::reply(json!({
            "jurisdiction": j.as_str(),
            "country": j.country(),
        }))
    }

    async fn health(&self) -> Result<ApiReply, ClientError> {
        Self::reply(json!({"status": "ok", "mode": "mock"}))
    }
}
