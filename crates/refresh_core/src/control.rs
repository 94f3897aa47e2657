pub type ControlId = u64;

/// Metadata read from a control element when it is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSpec {
    pub refresh_type: String,
    pub targets: Vec<String>,
    pub label: String,
}

impl ControlSpec {
    pub fn new(refresh_type: impl Into<String>, targets: &str, label: impl Into<String>) -> Self {
        Self {
            refresh_type: refresh_type.into(),
            targets: parse_targets(targets),
            label: label.into(),
        }
    }

    /// Declared targets, or the refresh type itself when none are declared.
    pub fn effective_targets(&self) -> Vec<String> {
        if self.targets.is_empty() {
            vec![self.refresh_type.clone()]
        } else {
            self.targets.clone()
        }
    }
}

/// Split a semicolon-delimited target list, dropping blank entries.
pub fn parse_targets(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
