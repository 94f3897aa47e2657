use crate::ControlId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefreshViewModel {
    pub controls: Vec<ControlView>,
    pub in_flight: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub control_id: ControlId,
    pub refresh_type: String,
    pub label: String,
    pub disabled: bool,
}
