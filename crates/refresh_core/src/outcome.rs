use thiserror::Error;

/// The single failure kind: the transport reported a non-success outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RefreshRequestFailed {
    /// HTTP status when the server answered at all.
    pub status: Option<u16>,
    /// Response body text, or a structured description when there was none.
    pub message: String,
}

impl RefreshRequestFailed {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success { body: String },
    Failure(RefreshRequestFailed),
}

impl From<Result<String, RefreshRequestFailed>> for RequestOutcome {
    fn from(result: Result<String, RefreshRequestFailed>) -> Self {
        match result {
            Ok(body) => RequestOutcome::Success { body },
            Err(err) => RequestOutcome::Failure(err),
        }
    }
}
