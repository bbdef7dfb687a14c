//! End-to-end tests for the HTTP client.
//!
//! Each test starts a real Axum server on a random port standing in for the
//! backend, then drives `NyayaClient` against it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use nyaya_client::{
    Backend, CaseLoader, ClientConfig, ClientError, FeedbackOutcome, NyayaClient, TRACE_HEADER,
};
use nyaya_core::feedback::FeedbackRejection;
use nyaya_core::{CaseQuery, Domain, EnforcementState, Jurisdiction, QueryRequest};

async fn start_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> NyayaClient {
    NyayaClient::new(ClientConfig {
        retry_backoff: Duration::from_millis(1),
        ..ClientConfig::with_base_url(base_url)
    })
    .unwrap()
}

#[tokio::test]
async fn trace_header_is_sent() {
    let app = Router::new().route(
        "/health",
        get(|headers: HeaderMap| async move {
            let seen = headers
                .get(TRACE_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({"status": "ok", "seen": seen}))
        }),
    );
    let base = start_server(app).await;

    let reply = client(&base).health().await.unwrap();
    let seen = reply.data["seen"].as_str().unwrap();
    assert!(seen.starts_with("frontend_"), "trace header was {seen:?}");
    assert_eq!(reply.trace_id.as_deref(), Some(seen));
}

#[tokio::test]
async fn error_status_maps_to_server_error() {
    let app = Router::new().route(
        "/nyaya/query",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "unsupported jurisdiction", "trace_id": "srv-42"})),
            )
        }),
    );
    let base = start_server(app).await;

    let req = QueryRequest::new("deposit").unwrap();
    let err = client(&base).submit_query(&req).await.unwrap_err();
    match &err {
        ClientError::Server {
            status, message, ..
        } => {
            assert_eq!(*status, 422);
            assert_eq!(message, "unsupported jurisdiction");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(err.trace_id(), Some("srv-42"));
}

#[tokio::test]
async fn get_retries_server_errors() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/nyaya/trace/{id}",
        get(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
                } else {
                    (StatusCode::OK, Json(json!({"trace_id": "t-1", "event_chain": []})))
                }
            }
        }),
    );
    let base = start_server(app).await;

    let reply = client(&base).get_trace("t-1").await.unwrap();
    assert_eq!(reply.trace_id.as_deref(), Some("t-1"));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn trace_id_with_reserved_characters_stays_in_trace_route() {
    let app = Router::new()
        .route(
            "/nyaya/trace/{id}",
            get(|Path(id): Path<String>| async move {
                Json(json!({"route": "trace", "trace_id": id}))
            }),
        )
        .route("/health", get(|| async { Json(json!({"route": "health"})) }));
    let base = start_server(app).await;
    let client = client(&base);

    for id in ["a/b", "abc?x=1", "../../health", "50%"] {
        let reply = client.get_trace(id).await.unwrap();
        assert_eq!(reply.data["route"], "trace", "id {id:?}");
        assert_eq!(reply.trace_id.as_deref(), Some(id));
    }

    let err = client.get_trace("..").await.unwrap_err();
    assert!(matches!(err, ClientError::Core(_)), "got {err:?}");
}

#[tokio::test]
async fn get_gives_up_after_max_retries() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/health",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::BAD_GATEWAY
            }
        }),
    );
    let base = start_server(app).await;

    let err = client(&base).health().await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 502, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn post_is_not_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/nyaya/query",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    );
    let base = start_server(app).await;

    let req = QueryRequest::new("deposit").unwrap();
    assert!(client(&base).submit_query(&req).await.is_err());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"status": "ok"}))
        }),
    );
    let base = start_server(app).await;

    let client = NyayaClient::new(ClientConfig {
        timeout: Duration::from_millis(100),
        max_retries: 0,
        ..ClientConfig::with_base_url(&base)
    })
    .unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn feedback_gate_runs_before_network() {
    let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let app = Router::new().route(
        "/nyaya/feedback",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                let trace_id = body["trace_id"].clone();
                sink.lock().unwrap().push(body);
                Json(json!({"status": "recorded", "trace_id": trace_id, "message": "ok"}))
            }
        }),
    );
    let base = start_server(app).await;
    let client = client(&base);

    let outcome = client
        .submit_feedback_signal("mock_12345", "helpful", &json!(true), "deposit")
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        FeedbackOutcome::Skipped(FeedbackRejection::MockTraceId(_))
    ));

    let outcome = client
        .submit_feedback_signal("abc123", "nonsense", &json!(true), "deposit")
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        FeedbackOutcome::Skipped(FeedbackRejection::InvalidType(_))
    ));
    assert!(received.lock().unwrap().is_empty());

    let outcome = client
        .submit_feedback_signal("abc123", "helpful", &json!(true), "deposit")
        .await
        .unwrap();
    let FeedbackOutcome::Sent(reply) = outcome else {
        panic!("expected feedback to be sent");
    };
    assert_eq!(reply.trace_id.as_deref(), Some("abc123"));

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "trace_id": "abc123",
            "rating": 5,
            "feedback_type": "helpful",
            "comment": "deposit - helpful: positive"
        })
    );
}

#[tokio::test]
async fn case_presentation_degrades_per_domain() {
    let app = Router::new()
        .route(
            "/nyaya/case_summary",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "caseId": params.get("case_id"),
                    "jurisdiction": params.get("jurisdiction"),
                    "keyFacts": "not-a-list"
                }))
            }),
        )
        .route(
            "/nyaya/legal_routes",
            get(|| async {
                Json(json!({
                    "routes": [{"name": "Mediation", "suitability": 0.95}],
                    "jurisdiction": "India"
                }))
            }),
        )
        .route(
            "/nyaya/timeline",
            get(|| async { Json(json!({"events": [{"type": "bogus", "status": "bogus"}]})) }),
        )
        .route(
            "/nyaya/glossary",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/nyaya/enforcement_status",
            get(|| async { Json(json!({"state": "escalate", "escalation_required": true})) }),
        );
    let base = start_server(app).await;

    let client = NyayaClient::new(ClientConfig {
        max_retries: 0,
        ..ClientConfig::with_base_url(&base)
    })
    .unwrap();
    let loader = CaseLoader::new(Arc::new(client));
    let query = CaseQuery {
        case_id: Some("C-55".into()),
        jurisdiction: Some(Jurisdiction::Uae),
    };
    let p = loader.load_latest(&query).await.unwrap();

    assert_eq!(p.degraded, vec![Domain::Glossary.as_str().to_string()]);
    assert_eq!(p.summary.case_id.as_deref(), Some("C-55"));
    assert_eq!(p.summary.jurisdiction.as_deref(), Some("UAE"));
    assert!(p.summary.key_facts.is_empty());

    let route = &p.routes.routes[0];
    assert_eq!(route.name, "Mediation");
    assert_eq!(route.suitability, 0.95);
    assert!(route.pros.is_empty());
    assert!(route.estimated_duration.is_none());

    assert_eq!(p.timeline.events[0].event_type.as_str(), "event");
    assert_eq!(p.timeline.events[0].status.as_str(), "pending");
    assert!(p.glossary.terms.is_empty());
    assert_eq!(p.enforcement.state, EnforcementState::Escalate);
    assert!(p.enforcement.escalation_required);
}
