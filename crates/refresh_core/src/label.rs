use serde::{Deserialize, Serialize};

/// How a control's label changes while its request is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelStyle {
    /// Replace the first occurrence of `idle` with `busy` ("Refresh X" -> "Refreshing X").
    Substitute { idle: String, busy: String },
    /// Replace the whole label.
    Fixed { busy: String },
}

impl Default for LabelStyle {
    fn default() -> Self {
        LabelStyle::Substitute {
            idle: "Refresh".to_string(),
            busy: "Refreshing".to_string(),
        }
    }
}

impl LabelStyle {
    pub fn busy_label(&self, idle_label: &str) -> String {
        match self {
            LabelStyle::Substitute { idle, busy } => idle_label.replacen(idle.as_str(), busy, 1),
            LabelStyle::Fixed { busy } => busy.clone(),
        }
    }
}
