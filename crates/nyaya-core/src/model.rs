//! Normalised case-presentation types.
//!
//! Every struct here is produced by [`crate::normalize`] and is total: each
//! field carries a value or its documented default. Serialised field names
//! match the backend's JSON so a normalised value can be fed back through
//! the normaliser unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// High-level summary of a case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub case_id: Option<String>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub key_facts: Vec<String>,
    pub jurisdiction: Option<String>,
    /// In `[0, 1]` when present.
    pub confidence: Option<f64>,
    pub summary_analysis: Option<String>,
    pub date_filed: Option<String>,
    pub status: Option<String>,
    pub parties: Option<Map<String, Value>>,
}

/// One candidate legal pathway (mediation, civil suit, arbitration, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalRoute {
    pub name: String,
    pub description: String,
    pub recommendation: String,
    pub suitability: f64,
    pub estimated_duration: Option<String>,
    pub estimated_cost: Option<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl LegalRoute {
    pub const DEFAULT_NAME: &'static str = "Unknown Route";
    pub const DEFAULT_SUITABILITY: f64 = 0.5;
}

impl Default for LegalRoute {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            description: String::new(),
            recommendation: String::new(),
            suitability: Self::DEFAULT_SUITABILITY,
            estimated_duration: None,
            estimated_cost: None,
            pros: Vec::new(),
            cons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalRoutesResult {
    pub routes: Vec<LegalRoute>,
    pub jurisdiction: Option<String>,
    pub case_type: Option<String>,
}

/// Kind of timeline entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Event,
    Deadline,
    Milestone,
    Step,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Deadline => "deadline",
            Self::Milestone => "milestone",
            Self::Step => "step",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "event" => Some(Self::Event),
            "deadline" => Some(Self::Deadline),
            "milestone" => Some(Self::Milestone),
            "step" => Some(Self::Step),
            _ => None,
        }
    }
}

/// Progress of a timeline entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Completed,
    #[default]
    Pending,
    Overdue,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    /// ISO 8601 timestamp string.
    pub date: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: EventStatus,
    pub documents: Vec<String>,
    pub parties: Vec<String>,
}

impl TimelineEvent {
    pub const DEFAULT_TITLE: &'static str = "Untitled Event";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
    pub jurisdiction: Option<String>,
    pub case_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
    pub context: Option<String>,
    pub related_terms: Vec<String>,
    pub jurisdiction: Option<String>,
    pub confidence: Option<f64>,
}

impl GlossaryTerm {
    pub const DEFAULT_TERM: &'static str = "Unknown Term";
}

impl Default for GlossaryTerm {
    fn default() -> Self {
        Self {
            term: Self::DEFAULT_TERM.to_string(),
            definition: String::new(),
            context: None,
            related_terms: Vec::new(),
            jurisdiction: None,
            confidence: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Glossary {
    pub terms: Vec<GlossaryTerm>,
    pub jurisdiction: Option<String>,
    pub case_type: Option<String>,
}

/// Backend-assigned classification of whether a legal pathway may proceed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementState {
    Block,
    Escalate,
    SoftRedirect,
    Conditional,
    #[default]
    Clear,
}

impl EnforcementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Escalate => "escalate",
            Self::SoftRedirect => "soft_redirect",
            Self::Conditional => "conditional",
            Self::Clear => "clear",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "block" => Some(Self::Block),
            "escalate" => Some(Self::Escalate),
            "soft_redirect" => Some(Self::SoftRedirect),
            "conditional" => Some(Self::Conditional),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    /// Human-facing banner label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Block => "BLOCKED",
            Self::Escalate => "ESCALATION REQUIRED",
            Self::SoftRedirect => "RECOMMENDED REDIRECT",
            Self::Conditional => "CONDITIONAL ACCESS",
            Self::Clear => "CLEAR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnforcementStatus {
    pub state: EnforcementState,
    pub reason: String,
    pub blocked_path: Option<String>,
    pub escalation_required: bool,
    pub escalation_target: Option<String>,
    pub redirect_suggestion: Option<String>,
    pub safe_explanation: String,
    pub trace_id: Option<String>,
}

/// The five case-presentation domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    CaseSummary,
    LegalRoutes,
    Timeline,
    Glossary,
    EnforcementStatus,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Self::CaseSummary,
        Self::LegalRoutes,
        Self::Timeline,
        Self::Glossary,
        Self::EnforcementStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CaseSummary => "case_summary",
            Self::LegalRoutes => "legal_routes",
            Self::Timeline => "timeline",
            Self::Glossary => "glossary",
            Self::EnforcementStatus => "enforcement_status",
        }
    }

    /// Backend path serving this domain.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::CaseSummary => "/nyaya/case_summary",
            Self::LegalRoutes => "/nyaya/legal_routes",
            Self::Timeline => "/nyaya/timeline",
            Self::Glossary => "/nyaya/glossary",
            Self::EnforcementStatus => "/nyaya/enforcement_status",
        }
    }

    /// Accepts `case_summary`, `case-summary`, and a few short aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "case_summary" | "summary" => Some(Self::CaseSummary),
            "legal_routes" | "routes" => Some(Self::LegalRoutes),
            "timeline" => Some(Self::Timeline),
            "glossary" => Some(Self::Glossary),
            "enforcement_status" | "enforcement" => Some(Self::EnforcementStatus),
            _ => None,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalised payload tagged with its domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    CaseSummary(CaseSummary),
    LegalRoutes(LegalRoutesResult),
    Timeline(Timeline),
    Glossary(Glossary),
    EnforcementStatus(EnforcementStatus),
}

impl Normalized {
    pub fn domain(&self) -> Domain {
        match self {
            Self::CaseSummary(_) => Domain::CaseSummary,
            Self::LegalRoutes(_) => Domain::LegalRoutes,
            Self::Timeline(_) => Domain::Timeline,
            Self::Glossary(_) => Domain::Glossary,
            Self::EnforcementStatus(_) => Domain::EnforcementStatus,
        }
    }
}

/// All five domains merged into one view, tagged with the load generation
/// that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CasePresentation {
    pub generation: u64,
    pub summary: CaseSummary,
    pub routes: LegalRoutesResult,
    pub timeline: Timeline,
    pub glossary: Glossary,
    pub enforcement: EnforcementStatus,
    /// Domains whose fetch failed and were replaced by defaults.
    pub degraded: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_literals_match_serde_names() {
        for state in [
            EnforcementState::Block,
            EnforcementState::Escalate,
            EnforcementState::SoftRedirect,
            EnforcementState::Conditional,
            EnforcementState::Clear,
        ] {
            let json = serde_json::to_value(state).unwrap();
            assert_eq!(json, Value::String(state.as_str().into()));
            assert_eq!(EnforcementState::parse(state.as_str()), Some(state));
        }
        assert_eq!(
            serde_json::to_value(EventType::Milestone).unwrap(),
            Value::String("milestone".into())
        );
    }

    #[test]
    fn timeline_event_serialises_type_field() {
        let ev = TimelineEvent {
            id: "e1".into(),
            date: "2026-01-01T00:00:00.000Z".into(),
            title: "Filing".into(),
            description: String::new(),
            event_type: EventType::Deadline,
            status: EventStatus::Overdue,
            documents: vec![],
            parties: vec![],
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "deadline");
        assert_eq!(json["status"], "overdue");
    }

    #[test]
    fn case_summary_uses_camel_case() {
        let json = serde_json::to_value(CaseSummary::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 10);
        for key in ["caseId", "keyFacts", "summaryAnalysis", "dateFiled"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn domain_parse_aliases() {
        assert_eq!(Domain::parse("case-summary"), Some(Domain::CaseSummary));
        assert_eq!(Domain::parse("Routes"), Some(Domain::LegalRoutes));
        assert_eq!(Domain::parse("enforcement"), Some(Domain::EnforcementStatus));
        assert_eq!(Domain::parse("nonsense"), None);
    }
}
