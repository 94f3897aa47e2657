use std::fmt;

use refresh_core::{ControlId, RefreshRequestFailed, RequestOutcome};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RequestCompleted {
        control_id: ControlId,
        outcome: RequestOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
    /// Response body text when the server answered with an error status.
    pub body: Option<String>,
}

/// Structured stand-in for an error response without a readable body.
#[derive(Debug, Serialize)]
struct FailureReport<'a> {
    status: Option<u16>,
    kind: String,
    message: &'a str,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }

    /// Text shown to the user: the raw body when there is one, JSON otherwise.
    pub fn report_text(&self) -> String {
        if let Some(body) = self.body.as_deref().filter(|b| !b.trim().is_empty()) {
            return body.to_string();
        }
        let report = FailureReport {
            status: self.status(),
            kind: self.kind.to_string(),
            message: &self.message,
        };
        serde_json::to_string(&report).unwrap_or_else(|_| format!("{}: {}", self.kind, self.message))
    }
}

impl From<FetchError> for RefreshRequestFailed {
    fn from(err: FetchError) -> Self {
        RefreshRequestFailed::new(err.status(), err.report_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Abandoned,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Abandoned => write!(f, "request abandoned"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
