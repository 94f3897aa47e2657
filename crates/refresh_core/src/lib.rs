//! Refresh core: pure state machine for refresh controls.
mod config;
mod control;
mod effect;
mod label;
mod msg;
mod outcome;
mod request;
mod state;
mod update;
mod view_model;

pub use config::{Endpoint, LookupPolicy, RefreshConfig};
pub use control::{parse_targets, ControlId, ControlSpec};
pub use effect::Effect;
pub use label::LabelStyle;
pub use msg::Msg;
pub use outcome::{RefreshRequestFailed, RequestOutcome};
pub use request::{build_request_url, refresh_param, RequestError};
pub use state::{ControlState, RefreshState};
pub use update::update;
pub use view_model::{ControlView, RefreshViewModel};
