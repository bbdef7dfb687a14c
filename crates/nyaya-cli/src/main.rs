mod display;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use nyaya_client::config::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};
use nyaya_client::{Backend, CaseLoader, ClientConfig, FeedbackOutcome, MockBackend, NyayaClient};
use nyaya_core::auth::{Authenticator, MockAuthenticator, SessionStore};
use nyaya_core::state::{Action, AppState, Consultation, Effect, View};
use nyaya_core::{
    CaseQuery, Domain, DomainHint, ExplainReasoningRequest, ExplanationLevel, Jurisdiction,
    MultiJurisdictionRequest, QueryRequest, UserRole, normalize,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nyaya", version, about = "Client for the Nyaya legal-analysis backend")]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,

    /// Directory holding the session file.
    #[arg(long, env = "NYAYA_STATE_DIR", default_value = ".nyaya", global = true)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConnectArgs {
    /// Backend base URL.
    #[arg(long, env = "NYAYA_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "NYAYA_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Extra attempts for GET requests after a transport failure.
    #[arg(long, env = "NYAYA_RETRIES", default_value_t = DEFAULT_MAX_RETRIES, global = true)]
    retries: u32,

    /// Use the built-in demo backend instead of the network.
    #[arg(long, env = "NYAYA_MOCK", global = true)]
    mock: bool,
}

impl ConnectArgs {
    fn backend(&self) -> anyhow::Result<Arc<dyn Backend>> {
        if self.mock {
            tracing::info!("using demo backend");
            return Ok(Arc::new(MockBackend::new()));
        }
        let config = ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.retries,
            ..ClientConfig::default()
        };
        Ok(Arc::new(
            NyayaClient::new(config).context("building HTTP client")?,
        ))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Ask a legal question in one jurisdiction.
    Query {
        text: String,
        #[arg(long, default_value = "India")]
        jurisdiction: Jurisdiction,
        #[arg(long)]
        domain: Option<DomainHint>,
        #[arg(long, default_value = "citizen")]
        role: UserRole,
        /// Answer from the demo backend if the real one fails.
        #[arg(long)]
        fallback: bool,
    },
    /// Compare a question across up to three jurisdictions.
    Multi {
        text: String,
        #[arg(long = "jurisdiction", required = true)]
        jurisdictions: Vec<Jurisdiction>,
    },
    /// Walk through the consultation wizard non-interactively.
    Consult {
        #[arg(long)]
        issue: String,
        #[arg(long)]
        description: String,
        #[arg(long = "attach")]
        attachments: Vec<String>,
        /// Country name, e.g. "United Kingdom".
        #[arg(long)]
        country: String,
        #[arg(long)]
        region: String,
    },
    /// Explain the reasoning behind a traced response.
    Explain {
        trace_id: String,
        #[arg(long, default_value = "detailed")]
        level: ExplanationLevel,
    },
    /// Rate a response (helpful, clear, matches_situation, ...).
    Feedback {
        trace_id: String,
        feedback_type: String,
        /// `true` or `false`.
        value: String,
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Show the audit trail for a trace id.
    Trace { trace_id: String },
    /// Backend health check.
    Health,
    /// Procedural information for a jurisdiction.
    Jurisdiction {
        #[arg(long)]
        jurisdiction: Option<Jurisdiction>,
    },
    /// Load summary, routes, timeline, glossary, and enforcement status.
    Case {
        #[arg(long)]
        case_id: Option<String>,
        #[arg(long)]
        jurisdiction: Option<Jurisdiction>,
        /// Print the merged presentation as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Normalise a saved payload offline. Reads stdin when FILE is omitted.
    Normalize {
        domain: String,
        file: Option<PathBuf>,
    },
    /// Log in (or sign up with --name). Demo only; any credentials work.
    Login {
        email: String,
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    Logout,
    Whoami,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nyaya=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("nyaya v{}", env!("CARGO_PKG_VERSION"));
    let session = SessionStore::in_dir(&cli.state_dir);

    match cli.command {
        Command::Query {
            text,
            jurisdiction,
            domain,
            role,
            fallback,
        } => {
            let request = QueryRequest::new(text)?
                .jurisdiction(jurisdiction)
                .domain(domain)
                .role(role);
            let reply = match cli.connect.backend()?.submit_query(&request).await {
                Ok(reply) => reply,
                Err(e) if fallback => {
                    tracing::warn!(error = %e, "backend error, answering from demo backend");
                    MockBackend::new().submit_query(&request).await?
                }
                Err(e) => return Err(e).context("query failed"),
            };
            display::print_analysis(&reply);
        }
        Command::Multi {
            text,
            jurisdictions,
        } => {
            let request = MultiJurisdictionRequest::new(text, jurisdictions)?;
            let reply = cli
                .connect
                .backend()?
                .submit_multi_jurisdiction(&request)
                .await
                .context("multi-jurisdiction query failed")?;
            display::print_comparison(&reply);
        }
        Command::Consult {
            issue,
            description,
            attachments,
            country,
            region,
        } => {
            let backend = cli.connect.backend()?;
            let form = ConsultForm {
                issue,
                description,
                attachments,
                country,
                region,
            };
            run_consultation(backend.as_ref(), session.user()?, form).await?;
        }
        Command::Explain { trace_id, level } => {
            let request = ExplainReasoningRequest::new(trace_id, level)?;
            let reply = cli
                .connect
                .backend()?
                .explain_reasoning(&request)
                .await
                .context("reasoning explanation failed")?;
            display::print_json(&reply.data)?;
        }
        Command::Feedback {
            trace_id,
            feedback_type,
            value,
            context,
        } => {
            let value = parse_flag(&value);
            let outcome = cli
                .connect
                .backend()?
                .submit_feedback_signal(&trace_id, &feedback_type, &value, &context)
                .await
                .context("feedback submission failed")?;
            match outcome {
                FeedbackOutcome::Sent(reply) => {
                    let message = reply
                        .data
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("Feedback submitted");
                    println!("{message}");
                }
                FeedbackOutcome::Skipped(reason) => println!("Feedback not sent: {reason}"),
            }
        }
        Command::Trace { trace_id } => {
            let reply = cli
                .connect
                .backend()?
                .get_trace(&trace_id)
                .await
                .context("trace retrieval failed")?;
            display::print_json(&reply.data)?;
        }
        Command::Health => match cli.connect.backend()?.health().await {
            Ok(reply) => display::print_json(&reply.data)?,
            Err(e) => bail!("backend service unavailable: {e}"),
        },
        Command::Jurisdiction { jurisdiction } => {
            let reply = cli
                .connect
                .backend()?
                .jurisdiction_info(jurisdiction)
                .await
                .context("jurisdiction info failed")?;
            display::print_json(&reply.data)?;
        }
        Command::Case {
            case_id,
            jurisdiction,
            json,
        } => {
            let loader = CaseLoader::new(cli.connect.backend()?);
            let query = CaseQuery {
                case_id,
                jurisdiction,
            };
            let presentation = loader
                .load_latest(&query)
                .await
                .context("case load was superseded")?;
            if json {
                display::print_json(&serde_json::to_value(&presentation)?)?;
            } else {
                display::print_case(&presentation);
            }
        }
        Command::Normalize { domain, file } => run_normalize(&domain, file.as_ref())?,
        Command::Login {
            email,
            password,
            name,
        } => {
            let user = match name {
                Some(name) => MockAuthenticator.sign_up(&name, &email, &password)?,
                None => MockAuthenticator.login(&email, &password)?,
            };
            session.set_user(&user)?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Command::Logout => {
            session.clear_user()?;
            println!("Logged out");
        }
        Command::Whoami => match session.user()? {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => println!("Not logged in"),
        },
    }

    Ok(())
}

/// `true`/`false` become booleans; anything else is passed through as a
/// string so the feedback gate can reject it.
fn parse_flag(raw: &str) -> Value {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Value::Bool(true),
        "false" | "no" | "n" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn run_normalize(domain: &str, file: Option<&PathBuf>) -> anyhow::Result<()> {
    let domain = Domain::parse(domain).with_context(|| {
        format!(
            "unknown domain '{domain}', expected one of: {}",
            Domain::ALL.map(|d| d.as_str()).join(", ")
        )
    })?;
    let mut text = String::new();
    match file {
        Some(path) => {
            text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
        }
    }
    // Unparseable input normalises like `null`.
    let raw: Value = serde_json::from_str(&text).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "input is not JSON, normalising as null");
        Value::Null
    });
    display::print_json(&serde_json::to_value(normalize(domain, &raw))?)
}

struct ConsultForm {
    issue: String,
    description: String,
    attachments: Vec<String>,
    country: String,
    region: String,
}

/// Drive the wizard through the reducer, running the submission it asks for.
async fn run_consultation(
    backend: &dyn Backend,
    user: Option<nyaya_core::auth::User>,
    form: ConsultForm,
) -> anyhow::Result<()> {
    let mut state = AppState::default();
    if let Some(user) = user {
        println!("Consultation for {}", user.name);
        state.reduce(Action::LoggedIn(user));
    }
    state.reduce(Action::Navigate(View::Consultation));

    let mut inputs = vec![
        Action::SetIssueType(form.issue),
        Action::Next,
        Action::SetDescription(form.description),
        Action::Next,
    ];
    inputs.extend(form.attachments.into_iter().map(Action::AddAttachment));
    inputs.extend([
        Action::Next,
        Action::SetCountry(form.country),
        Action::SetRegion(form.region),
        Action::Next,
    ]);

    let mut effect = None;
    for action in inputs {
        let step = state.consultation.step;
        let advancing = matches!(action, Action::Next);
        effect = state.reduce(action);
        if advancing && effect.is_none() && state.consultation.step == step {
            bail!("{}", blocked_reason(&state.consultation));
        }
    }

    let Some(Effect::SubmitConsultation(request)) = effect else {
        bail!("consultation did not reach submission");
    };
    match backend.submit_query(&request).await {
        Ok(reply) => {
            state.reduce(Action::ConsultationSucceeded(reply.data.clone()));
            display::print_analysis(&reply);
        }
        Err(e) => {
            state.reduce(Action::ConsultationFailed(e.to_string()));
            bail!(
                "consultation failed at step {}: {e}",
                state.consultation.step
            );
        }
    }
    Ok(())
}

fn blocked_reason(c: &Consultation) -> String {
    match c.step {
        1 => format!(
            "issue type must be one of: {}",
            nyaya_core::state::LEGAL_ISSUE_TYPES.join(", ")
        ),
        2 => "description must not be empty".to_string(),
        4 => {
            let j = c.jurisdiction();
            format!(
                "country and region are required (regions for {}: {})",
                j.country(),
                nyaya_core::state::regions(j).join(", ")
            )
        }
        step => format!("cannot advance from step {step}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_values() {
        assert_eq!(parse_flag("true"), Value::Bool(true));
        assert_eq!(parse_flag("No"), Value::Bool(false));
        assert_eq!(parse_flag("maybe"), Value::String("maybe".into()));
    }

    #[test]
    fn cli_parses_feedback() {
        let cli = Cli::try_parse_from(["nyaya", "--mock", "feedback", "abc123", "helpful", "true"])
            .unwrap();
        assert!(cli.connect.mock);
        assert!(matches!(cli.command, Command::Feedback { .. }));
    }

    #[test]
    fn cli_parses_multi_jurisdictions() {
        let cli = Cli::try_parse_from([
            "nyaya",
            "multi",
            "contract breach",
            "--jurisdiction",
            "India",
            "--jurisdiction",
            "United Kingdom",
        ])
        .unwrap();
        let Command::Multi { jurisdictions, .. } = cli.command else {
            panic!("expected multi");
        };
        assert_eq!(jurisdictions, vec![Jurisdiction::India, Jurisdiction::Uk]);
    }

    #[tokio::test]
    async fn consultation_submits_through_mock() {
        let form = ConsultForm {
            issue: "Consumer Complaint".into(),
            description: "Refund refused for a faulty phone".into(),
            attachments: vec!["receipt.pdf".into()],
            country: "United Arab Emirates".into(),
            region: "Dubai".into(),
        };
        run_consultation(&MockBackend::new(), None, form).await.unwrap();
    }

    #[tokio::test]
    async fn consultation_stops_on_missing_region() {
        let form = ConsultForm {
            issue: "Family Law".into(),
            description: "Custody question".into(),
            attachments: vec![],
            country: "India".into(),
            region: String::new(),
        };
        let err = run_consultation(&MockBackend::new(), None, form)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("country and region are required"));
    }
}
