use crate::ControlId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Rewrite the control's visible label.
    SetLabel { control_id: ControlId, label: String },
    /// Issue the network request for a control.
    SendRequest { control_id: ControlId, url: String },
    /// Splice the named fragments of `body` into the page.
    Splice {
        control_id: ControlId,
        body: String,
        targets: Vec<String>,
    },
    /// Show a blocking notification to the user.
    Alert { message: String },
}
