use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use refresh_core::{ControlId, RefreshRequestFailed, RequestOutcome};
use refresh_logging::{refresh_debug, refresh_warn};

use crate::decode::decode_body;
use crate::fetch::Transport;
use crate::{EngineEvent, FailureKind, FetchError, FetchOutput};

/// The background engine thread is gone; no request can be issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the request engine has stopped")]
pub struct EngineStopped;

enum EngineCommand {
    Send { control_id: ControlId, url: String },
}

/// Runs refresh requests on a background tokio runtime.
///
/// Each request reports back exactly one [`EngineEvent::RequestCompleted`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(transport: Arc<dyn Transport>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("refresh-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let transport = transport.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(transport.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn enqueue(
        &self,
        control_id: ControlId,
        url: impl Into<String>,
    ) -> Result<(), EngineStopped> {
        self.cmd_tx
            .send(EngineCommand::Send {
                control_id,
                url: url.into(),
            })
            .map_err(|_| EngineStopped)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// A handle whose engine thread has already exited.
    #[cfg(test)]
    pub(crate) fn stopped() -> Self {
        let (cmd_tx, _) = mpsc::channel();
        let (_, event_rx) = mpsc::channel();
        Self { cmd_tx, event_rx }
    }
}

async fn handle_command(
    transport: &dyn Transport,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Send { control_id, url } => {
            let guard = CompletionGuard::new(control_id, event_tx);
            refresh_debug!("Sending refresh request control_id={} url={}", control_id, url);
            let outcome = into_outcome(transport.fetch(&url).await);
            guard.complete(outcome);
        }
    }
}

fn into_outcome(result: Result<FetchOutput, FetchError>) -> RequestOutcome {
    let outcome = result.and_then(|output| {
        decode_body(&output.bytes, output.content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    });
    outcome.map_err(RefreshRequestFailed::from).into()
}

/// Held for the lifetime of one request. Dropping it without [`complete`]
/// reports a failure, so the control is always released.
///
/// [`complete`]: CompletionGuard::complete
struct CompletionGuard {
    control_id: ControlId,
    event_tx: Option<mpsc::Sender<EngineEvent>>,
}

impl CompletionGuard {
    fn new(control_id: ControlId, event_tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            control_id,
            event_tx: Some(event_tx),
        }
    }

    fn complete(mut self, outcome: RequestOutcome) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: RequestOutcome) {
        if let Some(event_tx) = self.event_tx.take() {
            let _ = event_tx.send(EngineEvent::RequestCompleted {
                control_id: self.control_id,
                outcome,
            });
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.event_tx.is_some() {
            refresh_warn!("Refresh request for control {} was abandoned", self.control_id);
            let err = FetchError::new(FailureKind::Abandoned, "request ended without a response");
            self.send(RequestOutcome::Failure(err.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use refresh_core::RequestOutcome;

    use super::{into_outcome, CompletionGuard, EngineHandle, EngineStopped};
    use crate::{EngineEvent, FailureKind, FetchError, FetchOutput};

    #[test]
    fn enqueue_reports_a_stopped_engine() {
        let engine = EngineHandle::stopped();
        assert_eq!(engine.enqueue(1, "http://localhost/?refresh-live"), Err(EngineStopped));
        assert!(engine.try_recv().is_none());
    }

    #[test]
    fn dropped_guard_reports_failure_once() {
        let (tx, rx) = mpsc::channel();
        drop(CompletionGuard::new(3, tx));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        let EngineEvent::RequestCompleted {
            control_id,
            outcome,
        } = &events[0];
        assert_eq!(*control_id, 3);
        assert!(matches!(outcome, RequestOutcome::Failure(_)));
    }

    #[test]
    fn completed_guard_does_not_report_again() {
        let (tx, rx) = mpsc::channel();
        CompletionGuard::new(1, tx).complete(RequestOutcome::Success {
            body: String::new(),
        });
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn outcome_carries_decoded_body_or_report() {
        let ok = into_outcome(Ok(FetchOutput {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            bytes: b"<p>ok</p>".to_vec(),
        }));
        assert_eq!(
            ok,
            RequestOutcome::Success {
                body: "<p>ok</p>".to_string()
            }
        );

        let failed = into_outcome(Err(FetchError::new(FailureKind::HttpStatus(500), "500")
            .with_body("bad state")));
        match failed {
            RequestOutcome::Failure(err) => {
                assert_eq!(err.status, Some(500));
                assert_eq!(err.message, "bad state");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
