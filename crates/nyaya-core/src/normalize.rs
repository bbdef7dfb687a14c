//! Response normalisation for case-presentation payloads.
//!
//! The backend returns loosely-typed JSON. Each `normalize_*` function takes
//! whatever arrived (possibly `null`, an array, or an object with missing or
//! wrong-typed fields) and returns a fully-defaulted structure. None of them
//! can fail: a mismatched field is replaced by its default, and elements of
//! nested sequences are defaulted field by field rather than dropped.

use std::collections::HashSet;

use chrono::SecondsFormat;
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{
    CaseSummary, Domain, EnforcementState, EnforcementStatus, EventStatus, EventType, Glossary,
    GlossaryTerm, LegalRoute, LegalRoutesResult, Normalized, Timeline, TimelineEvent,
};
use crate::trace::generate_token;

const EVENT_ID_PREFIX: &str = "event_";

/// Normalise `raw` as the payload for `domain`.
pub fn normalize(domain: Domain, raw: &Value) -> Normalized {
    match domain {
        Domain::CaseSummary => Normalized::CaseSummary(normalize_case_summary(raw)),
        Domain::LegalRoutes => Normalized::LegalRoutes(normalize_legal_routes(raw)),
        Domain::Timeline => Normalized::Timeline(normalize_timeline(raw)),
        Domain::Glossary => Normalized::Glossary(normalize_glossary(raw)),
        Domain::EnforcementStatus => {
            Normalized::EnforcementStatus(normalize_enforcement_status(raw))
        }
    }
}

/// Case summary. Anything but an object yields `CaseSummary::default()`:
/// every optional field `null`, `keyFacts` empty.
pub fn normalize_case_summary(raw: &Value) -> CaseSummary {
    let Some(obj) = raw.as_object() else {
        return CaseSummary::default();
    };
    CaseSummary {
        case_id: opt_string(obj, "caseId"),
        title: opt_string(obj, "title"),
        overview: opt_string(obj, "overview"),
        key_facts: string_list(obj, "keyFacts"),
        jurisdiction: opt_string(obj, "jurisdiction"),
        confidence: opt_number(obj, "confidence").filter(|c| (0.0..=1.0).contains(c)),
        summary_analysis: opt_string(obj, "summaryAnalysis"),
        date_filed: opt_string(obj, "dateFiled"),
        status: opt_string(obj, "status"),
        parties: obj.get("parties").and_then(Value::as_object).cloned(),
    }
}

/// Legal routes. Defaults to no routes; each route defaults to
/// "Unknown Route" with suitability 0.5.
pub fn normalize_legal_routes(raw: &Value) -> LegalRoutesResult {
    let Some(obj) = raw.as_object() else {
        return LegalRoutesResult::default();
    };
    LegalRoutesResult {
        routes: elements(obj, "routes").map(normalize_route).collect(),
        jurisdiction: opt_string(obj, "jurisdiction"),
        case_type: opt_string(obj, "caseType"),
    }
}

fn normalize_route(raw: &Value) -> LegalRoute {
    let Some(obj) = raw.as_object() else {
        return LegalRoute::default();
    };
    LegalRoute {
        name: string_or(obj, "name", LegalRoute::DEFAULT_NAME),
        description: string_or(obj, "description", ""),
        recommendation: string_or(obj, "recommendation", ""),
        suitability: opt_number(obj, "suitability").unwrap_or(LegalRoute::DEFAULT_SUITABILITY),
        estimated_duration: opt_string(obj, "estimatedDuration"),
        estimated_cost: opt_string(obj, "estimatedCost"),
        pros: string_list(obj, "pros"),
        cons: string_list(obj, "cons"),
    }
}

/// Timeline. Defaults to no events; each event gets a unique id, the current
/// time as its date, and `event`/`pending` for unknown type and status.
pub fn normalize_timeline(raw: &Value) -> Timeline {
    let Some(obj) = raw.as_object() else {
        return Timeline::default();
    };
    let now = chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut ids = EventIds::default();
    Timeline {
        events: elements(obj, "events")
            .map(|ev| normalize_event(ev, &now, &mut ids))
            .collect(),
        jurisdiction: opt_string(obj, "jurisdiction"),
        case_id: opt_string(obj, "caseId"),
    }
}

fn normalize_event(raw: &Value, now: &str, ids: &mut EventIds) -> TimelineEvent {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let id = match opt_string(obj, "id").filter(|id| !id.is_empty()) {
        Some(id) => ids.keep(id),
        None => ids.fresh(),
    };

    TimelineEvent {
        id,
        date: opt_string(obj, "date").unwrap_or_else(|| now.to_string()),
        title: string_or(obj, "title", TimelineEvent::DEFAULT_TITLE),
        description: string_or(obj, "description", ""),
        event_type: literal(obj, "type", EventType::parse),
        status: literal(obj, "status", EventStatus::parse),
        documents: string_list(obj, "documents"),
        parties: string_list(obj, "parties"),
    }
}

/// Glossary. Defaults to no terms; each term defaults to "Unknown Term".
pub fn normalize_glossary(raw: &Value) -> Glossary {
    let Some(obj) = raw.as_object() else {
        return Glossary::default();
    };
    Glossary {
        terms: elements(obj, "terms").map(normalize_term).collect(),
        jurisdiction: opt_string(obj, "jurisdiction"),
        case_type: opt_string(obj, "caseType"),
    }
}

fn normalize_term(raw: &Value) -> GlossaryTerm {
    let Some(obj) = raw.as_object() else {
        return GlossaryTerm::default();
    };
    GlossaryTerm {
        term: string_or(obj, "term", GlossaryTerm::DEFAULT_TERM),
        definition: string_or(obj, "definition", ""),
        context: opt_string(obj, "context"),
        related_terms: string_list(obj, "relatedTerms"),
        jurisdiction: opt_string(obj, "jurisdiction"),
        confidence: opt_number(obj, "confidence"),
    }
}

/// Enforcement status. Defaults to `clear` with no escalation.
pub fn normalize_enforcement_status(raw: &Value) -> EnforcementStatus {
    let Some(obj) = raw.as_object() else {
        return EnforcementStatus::default();
    };
    EnforcementStatus {
        state: literal(obj, "state", EnforcementState::parse),
        reason: string_or(obj, "reason", ""),
        blocked_path: opt_string(obj, "blocked_path"),
        escalation_required: obj
            .get("escalation_required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        escalation_target: opt_string(obj, "escalation_target"),
        redirect_suggestion: opt_string(obj, "redirect_suggestion"),
        safe_explanation: string_or(obj, "safe_explanation", ""),
        trace_id: opt_string(obj, "trace_id"),
    }
}

// ── Guards ──

fn opt_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn string_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    opt_string(obj, key).unwrap_or_else(|| default.to_string())
}

fn opt_number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// Strings of an array field. Non-string entries are skipped; a non-array is empty.
fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// All elements of an array field, whatever their shape.
fn elements<'a>(obj: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.as_slice())
        .unwrap_or_default()
        .iter()
}

/// Enum field with a fixed fallback. Unknown literals are coerced, not rejected.
fn literal<T: Default>(obj: &Map<String, Value>, key: &str, parse: fn(&str) -> Option<T>) -> T {
    match obj.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(Value::String(s)) => parse(s).unwrap_or_else(|| {
            debug!(field = key, value = %s, "unknown literal coerced to default");
            T::default()
        }),
        Some(other) => {
            debug!(field = key, value = %other, "non-string literal coerced to default");
            T::default()
        }
    }
}

/// Event ids seen in the current batch.
#[derive(Default)]
struct EventIds {
    seen: HashSet<String>,
}

impl EventIds {
    /// A repeated id is replaced with a fresh one.
    fn keep(&mut self, id: String) -> String {
        if self.seen.insert(id.clone()) {
            id
        } else {
            self.fresh()
        }
    }

    fn fresh(&mut self) -> String {
        loop {
            let id = generate_token(EVENT_ID_PREFIX);
            if self.seen.insert(id.clone()) {
                debug!(id = %id, "generated timeline event id");
                return id;
            }
        }
    }
}
