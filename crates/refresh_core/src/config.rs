use serde::{Deserialize, Serialize};

use crate::LabelStyle;

/// Where refresh requests are sent, relative to the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Endpoint {
    /// The page's own path.
    #[default]
    CurrentPath,
    /// A path resolved against the page URL, e.g. `"go"`.
    Relative(String),
}

/// Which elements of a response may satisfy a target id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LookupPolicy {
    /// The response's top-level elements and everything below them.
    #[default]
    Inclusive,
    /// Only elements nested inside a top-level element.
    DescendantsOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// CSS selector marking refresh controls.
    pub control_selector: String,
    pub endpoint: Endpoint,
    pub lookup: LookupPolicy,
    pub label_style: LabelStyle,
    /// First line of the alert shown when a refresh fails.
    pub failure_prefix: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            control_selector: "button.refresh".to_string(),
            endpoint: Endpoint::default(),
            lookup: LookupPolicy::default(),
            label_style: LabelStyle::default(),
            failure_prefix: "Couldn't refresh!".to_string(),
        }
    }
}

impl RefreshConfig {
    pub fn failure_message(&self, detail: &str) -> String {
        format!("{}\n{}", self.failure_prefix, detail)
    }
}
