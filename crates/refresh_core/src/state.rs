use std::collections::BTreeMap;

use url::Url;

use crate::view_model::{ControlView, RefreshViewModel};
use crate::{ControlId, ControlSpec, RefreshConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub spec: ControlSpec,
    pub label: String,
    /// Label captured when the current request started; `Some` while in flight.
    pub idle_label: Option<String>,
    pub disabled: bool,
}

impl ControlState {
    fn new(spec: ControlSpec) -> Self {
        Self {
            label: spec.label.clone(),
            spec,
            idle_label: None,
            disabled: false,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.idle_label.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefreshState {
    config: RefreshConfig,
    page_url: Option<Url>,
    controls: BTreeMap<ControlId, ControlState>,
}

impl RefreshState {
    pub fn new(config: RefreshConfig, page_url: Url) -> Self {
        Self {
            config,
            page_url: Some(page_url),
            controls: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn page_url(&self) -> Option<&Url> {
        self.page_url.as_ref()
    }

    pub fn control(&self, control_id: ControlId) -> Option<&ControlState> {
        self.controls.get(&control_id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.controls.values().filter(|c| c.in_flight()).count()
    }

    pub fn view(&self) -> RefreshViewModel {
        RefreshViewModel {
            controls: self
                .controls
                .iter()
                .map(|(control_id, control)| ControlView {
                    control_id: *control_id,
                    refresh_type: control.spec.refresh_type.clone(),
                    label: control.label.clone(),
                    disabled: control.disabled,
                })
                .collect(),
            in_flight: self.in_flight_count(),
        }
    }

    /// Returns false when the id is already bound.
    pub(crate) fn bind(&mut self, control_id: ControlId, spec: ControlSpec) -> bool {
        if self.controls.contains_key(&control_id) {
            return false;
        }
        self.controls.insert(control_id, ControlState::new(spec));
        true
    }

    pub(crate) fn control_mut(&mut self, control_id: ControlId) -> Option<&mut ControlState> {
        self.controls.get_mut(&control_id)
    }
}
