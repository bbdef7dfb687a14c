//! Client layer: HTTP transport to the Nyaya backend, a mock stand-in behind
//! the same [`Backend`] trait, and concurrent case-presentation loading.

pub mod config;
mod error;

pub mod backend;
pub mod http;
pub mod mock;
pub mod presentation;

pub use backend::{ApiReply, Backend, FeedbackOutcome};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::{NyayaClient, TRACE_HEADER};
pub use mock::MockBackend;
pub use presentation::CaseLoader;
