//! Refresh engine: page model, fragment splicing and request IO.
mod decode;
mod engine;
mod fetch;
mod fragment;
mod page;
mod session;
mod settings;
mod types;

pub use decode::{decode_body, DecodeError};
pub use engine::{EngineHandle, EngineStopped};
pub use fetch::{FetchSettings, ReqwestTransport, Transport};
pub use fragment::ResponseDocument;
pub use page::{BoundControl, Page, PageError};
pub use session::{LogNotifier, Notifier, RefreshSession, SessionError};
pub use settings::{load_config, parse_config, ConfigError};
pub use types::{EngineEvent, FailureKind, FetchError, FetchOutput};
