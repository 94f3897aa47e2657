use crate::{ControlId, ControlSpec, RequestOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A control element was found on the page and bound.
    ControlBound {
        control_id: ControlId,
        spec: ControlSpec,
    },
    /// User activated a control.
    Clicked { control_id: ControlId },
    /// The transport finished a control's request.
    RequestFinished {
        control_id: ControlId,
        outcome: RequestOutcome,
    },
}
