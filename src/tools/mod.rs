//! External collaborators: the news-search provider and report persistence.
//!
//! These sit outside the graph engine proper. The search provider is called
//! from inside the searcher node; the report sink is invoked after a
//! completed run.

pub mod report;
pub mod search;

pub use report::{FileReportSink, ReportSink};
pub use search::{SearchOptions, SearchProvider, TavilySearch};

use std::fmt;

/// A failed call to a non-generation collaborator (search, persistence).
#[derive(Debug)]
pub enum CollaboratorError {
    /// Transport failure: connect, TLS, timeout.
    Http(String),
    /// The collaborator answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body did not match the collaborator's documented shape.
    MalformedResponse(String),
    /// Local filesystem failure while persisting output.
    Io(String),
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "http: {msg}"),
            Self::Api { status, message } => {
                write!(f, "collaborator returned {status}: {message}")
            }
            Self::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for CollaboratorError {}

impl From<ureq::Error> for CollaboratorError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => CollaboratorError::Api {
                status,
                message: "request rejected".into(),
            },
            other => CollaboratorError::Http(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CollaboratorError {
    fn from(e: std::io::Error) -> Self {
        CollaboratorError::Io(e.to_string())
    }
}
