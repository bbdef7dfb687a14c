//! Core types for the Nyaya legal client: response normalisation, request
//! validation, trace ids, and application state.

mod error;

pub mod auth;
pub mod feedback;
pub mod model;
pub mod normalize;
pub mod request;
pub mod state;
pub mod trace;

pub use error::CoreError;
pub use feedback::{FeedbackRejection, validate_feedback};
pub use model::{
    CasePresentation, CaseSummary, Domain, EnforcementState, EnforcementStatus, EventStatus,
    EventType, Glossary, GlossaryTerm, LegalRoute, LegalRoutesResult, Normalized, Timeline,
    TimelineEvent,
};
pub use normalize::{
    normalize, normalize_case_summary, normalize_enforcement_status, normalize_glossary,
    normalize_legal_routes, normalize_timeline,
};
pub use request::{
    CaseQuery, DomainHint, ExplainReasoningRequest, ExplanationLevel, FeedbackRequest,
    Jurisdiction, MultiJurisdictionRequest, QueryRequest, UserRole,
};
