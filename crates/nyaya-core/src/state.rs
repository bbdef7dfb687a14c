//! Application state and its reducer.
//!
//! All UI state lives in one [`AppState`]. Front ends dispatch [`Action`]s
//! through [`AppState::reduce`], which may hand back an [`Effect`] for the
//! caller to run (a network request) and report back with another action.

use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::User;
use crate::model::CasePresentation;
use crate::request::{CaseQuery, Jurisdiction, QueryRequest};

pub const LEGAL_ISSUE_TYPES: &[&str] = &[
    "Employment Law",
    "Family Law",
    "Property Dispute",
    "Consumer Complaint",
    "Criminal Matter",
    "Corporate / Compliance",
    "Other",
];

/// Regions offered for each jurisdiction in the consultation form.
pub fn regions(jurisdiction: Jurisdiction) -> &'static [&'static str] {
    match jurisdiction {
        Jurisdiction::India => &[
            "Delhi",
            "Maharashtra",
            "Karnataka",
            "Tamil Nadu",
            "Gujarat",
            "West Bengal",
            "Rajasthan",
            "Uttar Pradesh",
        ],
        Jurisdiction::Uk => &["England", "Scotland", "Wales", "Northern Ireland"],
        Jurisdiction::Uae => &[
            "Abu Dhabi",
            "Dubai",
            "Sharjah",
            "Ajman",
            "Fujairah",
            "Ras Al Khaimah",
            "Umm Al Quwain",
        ],
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Dashboard,
    Query,
    MultiJurisdiction,
    Consultation,
    Procedure,
    Timeline,
    Glossary,
}

/// Tabs of the case-presentation view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseTab {
    #[default]
    Summary,
    Routes,
    Timeline,
    Glossary,
    Enforcement,
}

/// Five-step consultation wizard: issue type, description, attachments,
/// location, result.
#[derive(Debug, Clone, PartialEq)]
pub struct Consultation {
    pub step: u8,
    pub issue_type: String,
    pub description: String,
    pub attachments: Vec<String>,
    pub country: String,
    pub region: String,
    pub submitting: bool,
    pub response: Option<Value>,
    pub error: Option<String>,
}

impl Default for Consultation {
    fn default() -> Self {
        Self {
            step: Self::FIRST_STEP,
            issue_type: String::new(),
            description: String::new(),
            attachments: Vec::new(),
            country: String::new(),
            region: String::new(),
            submitting: false,
            response: None,
            error: None,
        }
    }
}

impl Consultation {
    pub const FIRST_STEP: u8 = 1;
    pub const SUBMIT_STEP: u8 = 4;
    pub const RESULT_STEP: u8 = 5;

    pub fn can_proceed(&self) -> bool {
        match self.step {
            1 => !self.issue_type.is_empty(),
            2 => !self.description.trim().is_empty(),
            3 => true,
            4 => !self.country.is_empty() && !self.region.is_empty(),
            _ => false,
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::from_country_or_default(&self.country)
    }

    fn query_request(&self) -> Option<QueryRequest> {
        QueryRequest::new(self.description.clone())
            .ok()
            .map(|req| req.jurisdiction(self.jurisdiction()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub view: View,
    pub user: Option<User>,
    pub consultation: Consultation,
    pub case_tab: CaseTab,
    pub case: Option<CasePresentation>,
    /// Generation of the most recently issued case load.
    pub case_generation: u64,
    pub case_loading: bool,
}

#[derive(Debug, Clone)]
pub enum Action {
    Navigate(View),
    LoggedIn(User),
    LoggedOut,
    SetIssueType(String),
    SetDescription(String),
    AddAttachment(String),
    SetCountry(String),
    SetRegion(String),
    Next,
    Back,
    ConsultationSucceeded(Value),
    ConsultationFailed(String),
    ResetConsultation,
    SelectTab(CaseTab),
    LoadCase(CaseQuery),
    CaseLoaded(CasePresentation),
}

/// Work the caller must perform, then report back.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send this query; answer with `ConsultationSucceeded` or `ConsultationFailed`.
    SubmitConsultation(QueryRequest),
    /// Fetch the case presentation stamped with `generation`; answer with `CaseLoaded`.
    LoadCase { generation: u64, query: CaseQuery },
}

impl AppState {
    pub fn reduce(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Navigate(view) => self.view = view,
            Action::LoggedIn(user) => self.user = Some(user),
            Action::LoggedOut => {
                self.user = None;
                self.view = View::Dashboard;
            }
            Action::SetIssueType(issue) => {
                if LEGAL_ISSUE_TYPES.contains(&issue.as_str()) {
                    self.consultation.issue_type = issue;
                } else {
                    warn!(issue = %issue, "ignoring unknown issue type");
                }
            }
            Action::SetDescription(text) => self.consultation.description = text,
            Action::AddAttachment(name) => self.consultation.attachments.push(name),
            Action::SetCountry(country) => {
                if self.consultation.country != country {
                    self.consultation.region.clear();
                }
                self.consultation.country = country;
            }
            Action::SetRegion(region) => self.consultation.region = region,
            Action::Next => return self.next_step(),
            Action::Back => {
                let c = &mut self.consultation;
                if c.step > Consultation::FIRST_STEP && !c.submitting {
                    c.step -= 1;
                }
            }
            Action::ConsultationSucceeded(response) => {
                let c = &mut self.consultation;
                c.submitting = false;
                c.error = None;
                c.response = Some(response);
                c.step = Consultation::RESULT_STEP;
            }
            Action::ConsultationFailed(error) => {
                let c = &mut self.consultation;
                c.submitting = false;
                c.error = Some(error);
            }
            Action::ResetConsultation => self.consultation = Consultation::default(),
            Action::SelectTab(tab) => self.case_tab = tab,
            Action::LoadCase(query) => {
                self.case_generation += 1;
                self.case_loading = true;
                return Some(Effect::LoadCase {
                    generation: self.case_generation,
                    query,
                });
            }
            Action::CaseLoaded(presentation) => {
                if presentation.generation != self.case_generation {
                    debug!(
                        stale = presentation.generation,
                        current = self.case_generation,
                        "discarding stale case presentation"
                    );
                    return None;
                }
                self.case_loading = false;
                self.case = Some(presentation);
            }
        }
        None
    }

    fn next_step(&mut self) -> Option<Effect> {
        let c = &mut self.consultation;
        if c.submitting || !c.can_proceed() {
            return None;
        }
        if c.step == Consultation::SUBMIT_STEP {
            let request = c.query_request()?;
            c.submitting = true;
            c.error = None;
            return Some(Effect::SubmitConsultation(request));
        }
        if c.step < Consultation::RESULT_STEP {
            c.step += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled_to_step_four() -> AppState {
        let mut state = AppState::default();
        state.reduce(Action::SetIssueType("Property Dispute".into()));
        state.reduce(Action::Next);
        state.reduce(Action::SetDescription("Landlord kept my deposit".into()));
        state.reduce(Action::Next);
        state.reduce(Action::Next);
        state.reduce(Action::SetCountry("United Kingdom".into()));
        state.reduce(Action::SetRegion("Wales".into()));
        state
    }

    #[test]
    fn wizard_blocks_until_step_is_complete() {
        let mut state = AppState::default();
        assert_eq!(state.reduce(Action::Next), None);
        assert_eq!(state.consultation.step, 1);

        state.reduce(Action::SetIssueType("Not a real issue".into()));
        state.reduce(Action::Next);
        assert_eq!(state.consultation.step, 1);

        state.reduce(Action::SetIssueType("Family Law".into()));
        state.reduce(Action::Next);
        assert_eq!(state.consultation.step, 2);

        state.reduce(Action::SetDescription("   ".into()));
        state.reduce(Action::Next);
        assert_eq!(state.consultation.step, 2);
    }

    #[test]
    fn step_four_emits_submission() {
        let mut state = filled_to_step_four();
        assert_eq!(state.consultation.step, 4);

        let effect = state.reduce(Action::Next).unwrap();
        let Effect::SubmitConsultation(req) = effect else {
            panic!("expected submission, got {effect:?}");
        };
        assert_eq!(req.jurisdiction_hint, Jurisdiction::Uk);
        assert_eq!(req.query, "Landlord kept my deposit");
        assert!(state.consultation.submitting);

        // Double submit is ignored while in flight.
        assert_eq!(state.reduce(Action::Next), None);

        state.reduce(Action::ConsultationSucceeded(json!({"trace_id": "t-1"})));
        assert_eq!(state.consultation.step, 5);
        assert_eq!(state.reduce(Action::Next), None);
        assert_eq!(state.consultation.step, 5);
    }

    #[test]
    fn failed_submission_stays_on_location_step() {
        let mut state = filled_to_step_four();
        state.reduce(Action::Next);
        state.reduce(Action::ConsultationFailed("timeout".into()));
        assert_eq!(state.consultation.step, 4);
        assert!(!state.consultation.submitting);
        assert_eq!(state.consultation.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn back_stops_at_first_step() {
        let mut state = filled_to_step_four();
        for _ in 0..10 {
            state.reduce(Action::Back);
        }
        assert_eq!(state.consultation.step, 1);
    }

    #[test]
    fn changing_country_clears_region() {
        let mut state = filled_to_step_four();
        state.reduce(Action::SetCountry("India".into()));
        assert!(state.consultation.region.is_empty());
        assert!(!state.consultation.can_proceed());
    }

    #[test]
    fn stale_case_load_is_discarded() {
        let mut state = AppState::default();
        let first = state.reduce(Action::LoadCase(CaseQuery::default()));
        let second = state.reduce(Action::LoadCase(CaseQuery {
            case_id: None,
            jurisdiction: Some(Jurisdiction::Uae),
        }));
        let Some(Effect::LoadCase { generation: g1, .. }) = first else {
            panic!("expected a load effect");
        };
        let Some(Effect::LoadCase { generation: g2, .. }) = second else {
            panic!("expected a load effect");
        };
        assert!(g2 > g1);

        state.reduce(Action::CaseLoaded(CasePresentation {
            generation: g2,
            ..Default::default()
        }));
        assert!(!state.case_loading);

        let mut stale = CasePresentation {
            generation: g1,
            ..Default::default()
        };
        stale.summary.title = Some("stale".into());
        state.reduce(Action::CaseLoaded(stale));
        assert_eq!(state.case.as_ref().unwrap().generation, g2);
        assert!(state.case.as_ref().unwrap().summary.title.is_none());
    }

    #[test]
    fn logout_returns_to_dashboard() {
        let mut state = AppState::default();
        state.reduce(Action::LoggedIn(User {
            email: "a@b.c".into(),
            name: "a".into(),
        }));
        state.reduce(Action::Navigate(View::Glossary));
        state.reduce(Action::LoggedOut);
        assert!(state.user.is_none());
        assert_eq!(state.view, View::Dashboard);
    }

    #[test]
    fn regions_cover_every_jurisdiction() {
        for j in Jurisdiction::ALL {
            assert!(!regions(j).is_empty());
        }
    }
}
