//! Validation gate for user feedback signals.
//!
//! A signal is a yes/no answer to one question ("was this helpful?") about
//! the response identified by a trace id. Invalid signals are rejected here
//! and never reach the backend.

use serde_json::Value;
use thiserror::Error;

use crate::request::FeedbackRequest;
use crate::trace::is_mock_trace_id;

/// Feedback types the client may send.
pub const ALLOWED_FEEDBACK_TYPES: &[&str] = &[
    "helpful",
    "clear",
    "matches_situation",
    "clarity",
    "correctness",
    "usefulness",
];

/// Longest comment the backend accepts, in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

pub const POSITIVE_RATING: u8 = 5;
pub const NEGATIVE_RATING: u8 = 1;

/// Why a feedback signal was not sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackRejection {
    #[error("no trace id")]
    MissingTraceId,
    #[error("trace id '{0}' belongs to a mock response")]
    MockTraceId(String),
    #[error("feedback value must be a boolean, got {0}")]
    InvalidValue(String),
    #[error("unknown feedback type '{0}'")]
    InvalidType(String),
}

pub fn is_valid_trace_id(trace_id: &str) -> bool {
    !trace_id.trim().is_empty()
}

pub fn is_valid_feedback_type(feedback_type: &str) -> bool {
    ALLOWED_FEEDBACK_TYPES.contains(&feedback_type)
}

/// Check a signal and map it onto the backend's 1-5 rating scale.
///
/// `true` rates 5, `false` rates 1. The comment records `context` plus the
/// answer, e.g. `"tenancy - helpful: positive"`. An over-long `context` is
/// cut so the comment stays within [`MAX_COMMENT_CHARS`].
pub fn validate_feedback(
    trace_id: &str,
    feedback_type: &str,
    value: &Value,
    context: &str,
) -> Result<FeedbackRequest, FeedbackRejection> {
    if !is_valid_trace_id(trace_id) {
        return Err(FeedbackRejection::MissingTraceId);
    }
    if is_mock_trace_id(trace_id) {
        return Err(FeedbackRejection::MockTraceId(trace_id.to_string()));
    }
    let Some(positive) = value.as_bool() else {
        return Err(FeedbackRejection::InvalidValue(value.to_string()));
    };
    if !is_valid_feedback_type(feedback_type) {
        return Err(FeedbackRejection::InvalidType(feedback_type.to_string()));
    }

    let verdict = if positive { "positive" } else { "negative" };
    let suffix = format!(" - {feedback_type}: {verdict}");
    let budget = MAX_COMMENT_CHARS.saturating_sub(suffix.chars().count());
    let context: String = context.chars().take(budget).collect();
    Ok(FeedbackRequest {
        trace_id: trace_id.to_string(),
        rating: if positive {
            POSITIVE_RATING
        } else {
            NEGATIVE_RATING
        },
        feedback_type: feedback_type.to_string(),
        comment: Some(format!("{context}{suffix}")),
    })
}
