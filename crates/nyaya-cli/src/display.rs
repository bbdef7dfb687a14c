//! Terminal cards for backend responses and case presentations.
//!
//! Each card is a header followed by aligned `key  value` rows grouped into
//! sections. Empty sections are skipped.

use nyaya_client::ApiReply;
use nyaya_core::{
    CasePresentation, CaseSummary, EnforcementState, EnforcementStatus, Glossary,
    LegalRoutesResult, Timeline, normalize_enforcement_status,
};
use serde_json::Value;

const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

/// Print a single-jurisdiction analysis from `POST /nyaya/query`.
pub fn print_analysis(reply: &ApiReply) {
    let data = &reply.data;
    println!("=== Legal Analysis ===");
    println!();

    let mut rows = Vec::new();
    push_str(&mut rows, "jurisdiction", data.get("jurisdiction"));
    push_str(&mut rows, "domain", data.get("domain"));
    if let Some(c) = data.get("confidence").and_then(Value::as_f64) {
        rows.push(("confidence", confidence_label(c)));
    }
    push_list(&mut rows, "legal_route", data.get("legal_route"));
    push_list(
        &mut rows,
        "constitutional_articles",
        data.get("constitutional_articles"),
    );
    if let Some(trace) = &reply.trace_id {
        rows.push(("trace_id", trace.clone()));
    }
    print_rows("Assessment", &rows);

    if let Some(raw) = data.get("enforcement_status") {
        print_enforcement(&normalize_enforcement_status(raw));
    }
}

/// Print a multi-jurisdiction comparison, one section per jurisdiction.
pub fn print_comparison(reply: &ApiReply) {
    println!("=== Multi-Jurisdiction Comparison ===");
    println!();
    let Some(analysis) = reply
        .data
        .get("comparative_analysis")
        .and_then(Value::as_object)
    else {
        println!("  (no comparative analysis returned)");
        return;
    };
    for (jurisdiction, result) in analysis {
        let mut rows = Vec::new();
        push_str(&mut rows, "domain", result.get("domain"));
        if let Some(c) = result.get("confidence").and_then(Value::as_f64) {
            rows.push(("confidence", confidence_label(c)));
        }
        push_list(&mut rows, "legal_route", result.get("legal_route"));
        push_list(
            &mut rows,
            "constitutional_articles",
            result.get("constitutional_articles"),
        );
        print_rows(jurisdiction, &rows);
    }
    if let Some(c) = reply.data.get("confidence").and_then(Value::as_f64) {
        println!("Overall confidence: {}", confidence_label(c));
    }
    if let Some(trace) = &reply.trace_id {
        println!("Trace ID: {trace}");
    }
}

/// Print the merged case presentation.
pub fn print_case(p: &CasePresentation) {
    print_summary(&p.summary);
    print_routes(&p.routes);
    print_timeline(&p.timeline);
    print_glossary(&p.glossary);
    print_enforcement(&p.enforcement);
    if !p.degraded.is_empty() {
        println!("Unavailable (showing defaults): {}", p.degraded.join(", "));
    }
}

/// Pretty-print any JSON payload.
pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Domain cards ──

fn print_summary(s: &CaseSummary) {
    let title = s.title.as_deref().unwrap_or("Untitled case");
    println!("=== {title} ===");
    if let Some(overview) = &s.overview {
        println!("{overview}");
    }
    println!();

    let mut rows = Vec::new();
    push_opt(&mut rows, "case_id", &s.case_id);
    push_opt(&mut rows, "jurisdiction", &s.jurisdiction);
    push_opt(&mut rows, "status", &s.status);
    push_opt(&mut rows, "date_filed", &s.date_filed);
    if let Some(c) = s.confidence {
        rows.push(("confidence", confidence_label(c)));
    }
    if let Some(parties) = &s.parties {
        let rendered: Vec<String> = parties
            .iter()
            .map(|(role, who)| format!("{role}: {}", plain(who)))
            .collect();
        rows.push(("parties", rendered.join("; ")));
    }
    print_rows("Summary", &rows);

    if !s.key_facts.is_empty() {
        println!("Key Facts");
        print_bullets(&s.key_facts);
        println!();
    }
    if let Some(analysis) = &s.summary_analysis {
        println!("Analysis");
        println!("  {analysis}");
        println!();
    }
}

fn print_routes(r: &LegalRoutesResult) {
    if r.routes.is_empty() {
        return;
    }
    println!("Legal Routes");
    for route in &r.routes {
        println!(
            "  {:<26} suitability {:.0}%",
            route.name,
            route.suitability * 100.0
        );
        if !route.description.is_empty() {
            println!("    {}", route.description);
        }
        if !route.recommendation.is_empty() {
            println!("    recommendation: {}", route.recommendation);
        }
        if let Some(d) = &route.estimated_duration {
            println!("    duration: {d}");
        }
        if let Some(c) = &route.estimated_cost {
            println!("    cost: {c}");
        }
        if !route.pros.is_empty() {
            println!("    pros: {}", truncated(&route.pros));
        }
        if !route.cons.is_empty() {
            println!("    cons: {}", truncated(&route.cons));
        }
    }
    println!();
}

fn print_timeline(t: &Timeline) {
    if t.events.is_empty() {
        return;
    }
    println!("Timeline");
    for ev in &t.events {
        let date = ev.date.get(..10).unwrap_or(&ev.date);
        println!(
            "  {date}  [{:<9}] {:<9} {}",
            ev.status.as_str(),
            ev.event_type.as_str(),
            ev.title
        );
        if !ev.description.is_empty() {
            println!("              {}", ev.description);
        }
    }
    println!();
}

fn print_glossary(g: &Glossary) {
    if g.terms.is_empty() {
        return;
    }
    println!("Glossary");
    for term in g.terms.iter().take(MAX_LIST_ITEMS) {
        println!("  {:<26} {}", term.term, term.definition);
        if !term.related_terms.is_empty() {
            println!("  {:<26} see also: {}", "", truncated(&term.related_terms));
        }
    }
    if g.terms.len() > MAX_LIST_ITEMS {
        println!("  ... and {} more", g.terms.len() - MAX_LIST_ITEMS);
    }
    println!();
}

/// Clear status prints nothing.
fn print_enforcement(e: &EnforcementStatus) {
    if e.state == EnforcementState::Clear {
        return;
    }
    println!("!! {} !!", e.state.label());
    let mut rows = Vec::new();
    if !e.reason.is_empty() {
        rows.push(("reason", e.reason.clone()));
    }
    push_opt(&mut rows, "blocked_path", &e.blocked_path);
    if e.escalation_required {
        rows.push((
            "escalation_target",
            e.escalation_target
                .clone()
                .unwrap_or_else(|| "required".into()),
        ));
    }
    push_opt(&mut rows, "redirect_suggestion", &e.redirect_suggestion);
    if !e.safe_explanation.is_empty() {
        rows.push(("explanation", e.safe_explanation.clone()));
    }
    push_opt(&mut rows, "trace_id", &e.trace_id);
    print_rows("Enforcement Status", &rows);
}

// ── Helpers ──

fn print_rows(header: &str, rows: &[(&str, String)]) {
    if rows.is_empty() {
        return;
    }
    println!("{header}");
    for (key, value) in rows {
        println!("  {key:<26} {value}");
    }
    println!();
}

fn print_bullets(items: &[String]) {
    for item in items.iter().take(MAX_LIST_ITEMS) {
        println!("  - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        println!("  ... and {} more", items.len() - MAX_LIST_ITEMS);
    }
}

fn push_opt<'a>(rows: &mut Vec<(&'a str, String)>, key: &'a str, value: &Option<String>) {
    if let Some(v) = value {
        rows.push((key, v.clone()));
    }
}

fn push_str<'a>(rows: &mut Vec<(&'a str, String)>, key: &'a str, value: Option<&Value>) {
    if let Some(s) = value.and_then(Value::as_str) {
        rows.push((key, s.to_string()));
    }
}

fn push_list<'a>(rows: &mut Vec<(&'a str, String)>, key: &'a str, value: Option<&Value>) {
    let items: Vec<String> = value
        .and_then(Value::as_array)
        .map(|a| a.iter().map(plain).collect())
        .unwrap_or_default();
    if !items.is_empty() {
        rows.push((key, truncated(&items)));
    }
}

/// Strings without their JSON quotes; everything else as JSON.
fn plain(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncated(items: &[String]) -> String {
    let mut out = items
        .iter()
        .take(MAX_LIST_ITEMS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > MAX_LIST_ITEMS {
        out.push_str(&format!(", ... (+{})", items.len() - MAX_LIST_ITEMS));
    }
    out
}

/// `0.85` → `85% (high)`.
fn confidence_label(c: f64) -> String {
    let band = if c >= 0.8 {
        "high"
    } else if c >= 0.5 {
        "moderate"
    } else {
        "low"
    };
    format!("{:.0}% ({band})", c * 100.0)
}
