use std::sync::Arc;
use std::time::{Duration, Instant};

use refresh_core::{
    update, ControlId, Effect, Msg, RefreshConfig, RefreshRequestFailed, RefreshState,
    RefreshViewModel, RequestOutcome,
};
use refresh_logging::{refresh_debug, refresh_error, refresh_info, refresh_warn};
use thiserror::Error;
use url::Url;

use crate::fetch::Transport;
use crate::fragment::ResponseDocument;
use crate::page::{BoundControl, Page, PageError};
use crate::{EngineEvent, EngineHandle};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid page url {url:?}: {source}")]
    PageUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to start the request engine: {0}")]
    Engine(#[from] std::io::Error),
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Blocking, user-facing notification.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Notifier for headless hosts: alerts go to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        refresh_warn!("{}", message);
    }
}

/// Drives one page on the caller's thread. Clicks and engine completions are
/// turned into messages for the core, and its effects are applied to the page.
pub struct RefreshSession {
    page: Page,
    state: RefreshState,
    engine: EngineHandle,
    notifier: Box<dyn Notifier>,
}

impl RefreshSession {
    pub fn new(
        page_html: &str,
        page_url: &str,
        config: RefreshConfig,
        transport: Arc<dyn Transport>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, SessionError> {
        let url = Url::parse(page_url).map_err(|source| SessionError::PageUrl {
            url: page_url.to_string(),
            source,
        })?;
        Ok(Self {
            page: Page::parse(page_html),
            state: RefreshState::new(config, url),
            engine: EngineHandle::new(transport)?,
            notifier,
        })
    }

    /// Bind all not-yet-bound controls under `root_id`, or the whole page.
    pub fn initialize(&mut self, root_id: Option<&str>) -> Result<Vec<BoundControl>, SessionError> {
        let selector = self.state.config().control_selector.clone();
        let bound = self.page.initialize(root_id, &selector)?;
        for control in &bound {
            self.dispatch(Msg::ControlBound {
                control_id: control.control_id,
                spec: control.spec.clone(),
            });
        }
        refresh_info!("Bound {} refresh controls", bound.len());
        Ok(bound)
    }

    pub fn click(&mut self, control_id: ControlId) {
        self.dispatch(Msg::Clicked { control_id });
    }

    /// First bound control requesting `refresh_type`.
    pub fn control_for(&self, refresh_type: &str) -> Option<ControlId> {
        self.state
            .view()
            .controls
            .into_iter()
            .find(|control| control.refresh_type == refresh_type)
            .map(|control| control.control_id)
    }

    /// Apply every completion already delivered, without waiting.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.engine.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for one completion, then drain any others.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.engine.recv_timeout(timeout) {
            Some(event) => {
                self.handle_event(event);
                1 + self.pump()
            }
            None => 0,
        }
    }

    /// Returns true once no request is in flight, false if `timeout` passed first.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.in_flight_count() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            self.pump_timeout(remaining);
        }
        true
    }

    pub fn view(&self) -> RefreshViewModel {
        self.state.view()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::RequestCompleted {
                control_id,
                outcome,
            } => self.dispatch(Msg::RequestFinished {
                control_id,
                outcome,
            }),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = update(state, msg);
        self.state = next;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::SetLabel { control_id, label } => {
                if !self.page.set_label(control_id, &label) {
                    refresh_warn!("Control {} is not on the page", control_id);
                }
            }
            Effect::SendRequest { control_id, url } => {
                refresh_info!("Refreshing control {} via {}", control_id, url);
                if let Err(err) = self.engine.enqueue(control_id, url) {
                    refresh_error!("Control {}: {}", control_id, err);
                    self.dispatch(Msg::RequestFinished {
                        control_id,
                        outcome: RequestOutcome::Failure(RefreshRequestFailed::new(
                            None,
                            err.to_string(),
                        )),
                    });
                }
            }
            Effect::Splice {
                control_id,
                body,
                targets,
            } => self.splice(control_id, &body, &targets),
            Effect::Alert { message } => self.notifier.alert(&message),
        }
    }

    fn splice(&mut self, control_id: ControlId, body: &str, targets: &[String]) {
        let response = ResponseDocument::parse(body);
        let policy = self.state.config().lookup;
        for target in targets {
            let Some(fragment) = response.find(target, policy) else {
                refresh_debug!(
                    "Control {}: target #{} not in response, skipped",
                    control_id,
                    target
                );
                continue;
            };
            if !self.page.splice(target, fragment) {
                refresh_warn!(
                    "Control {}: target #{} not on the page, skipped",
                    control_id,
                    target
                );
            }
        }
    }
}
