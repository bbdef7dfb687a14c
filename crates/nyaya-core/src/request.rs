//! Outgoing request payloads for the Nyaya backend.
//!
//! Builders validate locally so malformed requests never leave the client.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Legal systems the backend routes between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[default]
    India,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "UAE")]
    Uae,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [Self::India, Self::Uk, Self::Uae];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Uk => "UK",
            Self::Uae => "UAE",
        }
    }

    /// Country name as shown in the consultation form.
    pub fn country(&self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Uk => "United Kingdom",
            Self::Uae => "United Arab Emirates",
        }
    }

    /// Parse a jurisdiction code or country display name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "india" | "in" => Some(Self::India),
            "uk" | "united kingdom" | "gb" => Some(Self::Uk),
            "uae" | "united arab emirates" | "ae" => Some(Self::Uae),
            _ => None,
        }
    }

    /// Like [`parse`](Self::parse), but unknown names fall back to India.
    pub fn from_country_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Jurisdiction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| CoreError::InvalidRequest(format!("unknown jurisdiction '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainHint {
    Criminal,
    Civil,
    Constitutional,
}

impl std::str::FromStr for DomainHint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "criminal" => Ok(Self::Criminal),
            "civil" => Ok(Self::Civil),
            "constitutional" => Ok(Self::Constitutional),
            other => Err(CoreError::InvalidRequest(format!(
                "unknown domain hint '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Citizen,
    Lawyer,
    Student,
}

impl std::str::FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "citizen" => Ok(Self::Citizen),
            "lawyer" => Ok(Self::Lawyer),
            "student" => Ok(Self::Student),
            other => Err(CoreError::InvalidRequest(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub role: UserRole,
    pub confidence_required: bool,
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            role: UserRole::Citizen,
            confidence_required: true,
        }
    }
}

/// Body of `POST /nyaya/query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub jurisdiction_hint: Jurisdiction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_hint: Option<DomainHint>,
    pub user_context: UserContext,
}

impl QueryRequest {
    /// Query with the default hint (India) and a citizen context.
    pub fn new(query: impl Into<String>) -> Result<Self, CoreError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(CoreError::InvalidRequest("query must not be empty".into()));
        }
        Ok(Self {
            query,
            jurisdiction_hint: Jurisdiction::default(),
            domain_hint: None,
            user_context: UserContext::default(),
        })
    }

    pub fn jurisdiction(mut self, jurisdiction: Jurisdiction) -> Self {
        self.jurisdiction_hint = jurisdiction;
        self
    }

    pub fn domain(mut self, domain: Option<DomainHint>) -> Self {
        self.domain_hint = domain;
        self
    }

    pub fn role(mut self, role: UserRole) -> Self {
        self.user_context.role = role;
        self
    }
}

/// Body of `POST /nyaya/multi_jurisdiction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiJurisdictionRequest {
    pub query: String,
    pub jurisdictions: Vec<Jurisdiction>,
}

impl MultiJurisdictionRequest {
    pub const MAX_JURISDICTIONS: usize = 3;

    /// Duplicates are removed, preserving first occurrence. Between one and
    /// three jurisdictions must remain.
    pub fn new(
        query: impl Into<String>,
        jurisdictions: impl IntoIterator<Item = Jurisdiction>,
    ) -> Result<Self, CoreError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(CoreError::InvalidRequest("query must not be empty".into()));
        }
        let mut unique: Vec<Jurisdiction> = Vec::new();
        for j in jurisdictions {
            if !unique.contains(&j) {
                unique.push(j);
            }
        }
        if unique.is_empty() || unique.len() > Self::MAX_JURISDICTIONS {
            return Err(CoreError::InvalidRequest(format!(
                "expected 1 to {} jurisdictions, got {}",
                Self::MAX_JURISDICTIONS,
                unique.len()
            )));
        }
        Ok(Self {
            query,
            jurisdictions: unique,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationLevel {
    Brief,
    #[default]
    Detailed,
    Constitutional,
}

impl std::str::FromStr for ExplanationLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(Self::Brief),
            "detailed" => Ok(Self::Detailed),
            "constitutional" => Ok(Self::Constitutional),
            other => Err(CoreError::InvalidRequest(format!(
                "unknown explanation level '{other}'"
            ))),
        }
    }
}

/// Body of `POST /nyaya/explain_reasoning`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainReasoningRequest {
    pub trace_id: String,
    pub explanation_level: ExplanationLevel,
}

impl ExplainReasoningRequest {
    pub fn new(trace_id: impl Into<String>, level: ExplanationLevel) -> Result<Self, CoreError> {
        let trace_id = trace_id.into();
        if trace_id.trim().is_empty() {
            return Err(CoreError::InvalidRequest("trace id must not be empty".into()));
        }
        Ok(Self {
            trace_id,
            explanation_level: level,
        })
    }
}

/// Body of `POST /nyaya/feedback`. Built by [`crate::feedback::validate_feedback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub trace_id: String,
    /// 1 to 5.
    pub rating: u8,
    pub feedback_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Case-presentation lookup parameters, sent as query-string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseQuery {
    pub case_id: Option<String>,
    pub jurisdiction: Option<Jurisdiction>,
}

impl CaseQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = &self.case_id {
            params.push(("case_id", id.clone()));
        }
        if let Some(j) = self.jurisdiction {
            params.push(("jurisdiction", j.as_str().to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn jurisdiction_parses_country_names() {
        assert_eq!(Jurisdiction::parse("United Kingdom"), Some(Jurisdiction::Uk));
        assert_eq!(Jurisdiction::parse("united arab emirates"), Some(Jurisdiction::Uae));
        assert_eq!(Jurisdiction::parse(" India "), Some(Jurisdiction::India));
        assert_eq!(Jurisdiction::parse("Narnia"), None);
        assert_eq!(Jurisdiction::from_country_or_default("Narnia"), Jurisdiction::India);
    }

    #[test]
    fn jurisdiction_serialises_as_code() {
        assert_eq!(serde_json::to_value(Jurisdiction::Uae).unwrap(), json!("UAE"));
        assert_eq!(serde_json::to_value(Jurisdiction::Uk).unwrap(), json!("UK"));
        for j in Jurisdiction::ALL {
            assert_eq!(Jurisdiction::parse(j.country()), Some(j));
        }
    }

    #[test]
    fn query_request_defaults() {
        let req = QueryRequest::new("Can my landlord keep the deposit?").unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "Can my landlord keep the deposit?",
                "jurisdiction_hint": "India",
                "user_context": {"role": "citizen", "confidence_required": true}
            })
        );
    }

    #[test]
    fn query_request_rejects_blank() {
        assert!(matches!(
            QueryRequest::new("   "),
            Err(CoreError::InvalidRequest(_))
        ));
    }

    #[test]
    fn query_request_builder_chain() {
        let req = QueryRequest::new("theft")
            .unwrap()
            .jurisdiction(Jurisdiction::Uk)
            .domain(Some(DomainHint::Criminal))
            .role(UserRole::Lawyer);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["jurisdiction_hint"], "UK");
        assert_eq!(body["domain_hint"], "criminal");
        assert_eq!(body["user_context"]["role"], "lawyer");
    }

    #[test]
    fn multi_jurisdiction_bounds() {
        assert!(MultiJurisdictionRequest::new("q", []).is_err());
        let req = MultiJurisdictionRequest::new(
            "q",
            [Jurisdiction::India, Jurisdiction::Uk, Jurisdiction::India],
        )
        .unwrap();
        assert_eq!(req.jurisdictions, vec![Jurisdiction::India, Jurisdiction::Uk]);
        assert!(MultiJurisdictionRequest::new("", [Jurisdiction::Uae]).is_err());
    }

    #[test]
    fn explain_request_requires_trace() {
        assert!(ExplainReasoningRequest::new("", ExplanationLevel::Brief).is_err());
        let req = ExplainReasoningRequest::new("t-1", ExplanationLevel::default()).unwrap();
        assert_eq!(serde_json::to_value(&req).unwrap()["explanation_level"], "detailed");
    }

    #[test]
    fn case_query_params() {
        let q = CaseQuery {
            case_id: Some("C-1".into()),
            jurisdiction: Some(Jurisdiction::Uae),
        };
        assert_eq!(
            q.params(),
            vec![("case_id", "C-1".to_string()), ("jurisdiction", "UAE".to_string())]
        );
        assert!(CaseQuery::default().params().is_empty());
    }
}
