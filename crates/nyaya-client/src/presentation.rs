//! Concurrent loading of the five case-presentation domains.
//!
//! The domains are fetched in parallel and joined before merging. Each one is
//! normalised on its own, so a failed or timed-out domain degrades to its
//! default structure without affecting the others.
//!
//! Every load is stamped with a generation. When the user switches case or
//! jurisdiction mid-flight, the older load's result is recognisably stale and
//! can be dropped instead of overwriting the newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use nyaya_core::{CasePresentation, CaseQuery, Domain, normalize};
use nyaya_core::model::Normalized;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::Backend;

pub struct CaseLoader {
    backend: Arc<dyn Backend>,
    generation: AtomicU64,
}

impl CaseLoader {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            generation: AtomicU64::new(0),
        }
    }

    /// Issue a new generation, superseding any load still in flight.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    /// Load under a fresh generation. Returns `None` if another load began
    /// before this one finished.
    pub async fn load_latest(&self, query: &CaseQuery) -> Option<CasePresentation> {
        let generation = self.begin();
        let presentation = self.load_as(generation, query).await;
        if self.is_current(generation) {
            Some(presentation)
        } else {
            debug!(
                generation,
                current = self.current(),
                "discarding superseded case load"
            );
            None
        }
    }

    /// Fetch all five domains concurrently and merge them. Never fails:
    /// failed domains fall back to defaults and are listed in `degraded`.
    pub async fn load_as(&self, generation: u64, query: &CaseQuery) -> CasePresentation {
        let (summary, routes, timeline, glossary, enforcement) = futures::join!(
            self.fetch(Domain::CaseSummary, query),
            self.fetch(Domain::LegalRoutes, query),
            self.fetch(Domain::Timeline, query),
            self.fetch(Domain::Glossary, query),
            self.fetch(Domain::EnforcementStatus, query),
        );

        let mut presentation = CasePresentation {
            generation,
            ..Default::default()
        };
        for fetched in [summary, routes, timeline, glossary, enforcement] {
            if !fetched.ok {
                presentation.degraded.push(fetched.domain.as_str().to_string());
            }
            match normalize(fetched.domain, &fetched.raw) {
                Normalized::CaseSummary(v) => presentation.summary = v,
                Normalized::LegalRoutes(v) => presentation.routes = v,
                Normalized::Timeline(v) => presentation.timeline = v,
                Normalized::Glossary(v) => presentation.glossary = v,
                Normalized::EnforcementStatus(v) => presentation.enforcement = v,
            }
        }

        info!(
            generation,
            degraded = presentation.degraded.len(),
            "case presentation loaded"
        );
        presentation
    }

    async fn fetch(&self, domain: Domain, query: &CaseQuery) -> Fetched {
        match self.backend.fetch_domain(domain, query).await {
            Ok(raw) => Fetched {
                domain,
                raw,
                ok: true,
            },
            Err(e) => {
                warn!(domain = %domain, error = %e, "domain fetch failed, using defaults");
                Fetched {
                    domain,
                    raw: Value::Null,
                    ok: false,
                }
            }
        }
    }
}

/// Raw payload for one domain; `null` when the fetch failed.
struct Fetched {
    domain: Domain,
    raw: Value,
    ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use nyaya_core::{EnforcementState, Jurisdiction};

    fn uk() -> CaseQuery {
        CaseQuery {
            case_id: Some("C-7".into()),
            jurisdiction: Some(Jurisdiction::Uk),
        }
    }

    #[tokio::test]
    async fn loads_all_domains() {
        let loader = CaseLoader::new(Arc::new(MockBackend::new()));
        let p = loader.load_latest(&uk()).await.unwrap();
        assert_eq!(p.generation, 1);
        assert!(p.degraded.is_empty());
        assert_eq!(p.summary.case_id.as_deref(), Some("C-7"));
        assert_eq!(p.routes.routes[0].name, "Mediation");
        assert_eq!(p.timeline.events.len(), 3);
        assert_eq!(p.glossary.jurisdiction.as_deref(), Some("UK"));
        assert_eq!(p.enforcement.state, EnforcementState::Clear);
    }

    #[tokio::test]
    async fn failed_domain_degrades_alone() {
        let backend = MockBackend::new().failing(Domain::Glossary);
        let loader = CaseLoader::new(Arc::new(backend));
        let p = loader.load_latest(&uk()).await.unwrap();
        assert_eq!(p.degraded, vec!["glossary".to_string()]);
        assert!(p.glossary.terms.is_empty());
        assert_eq!(p.timeline.events.len(), 3);
    }

    #[tokio::test]
    async fn superseded_generation_is_not_current() {
        let loader = CaseLoader::new(Arc::new(MockBackend::new()));
        let first = loader.begin();
        let second = loader.begin();
        let stale = loader.load_as(first, &uk()).await;
        assert_eq!(stale.generation, first);
        assert!(!loader.is_current(first));
        assert!(loader.is_current(second));
    }
}
