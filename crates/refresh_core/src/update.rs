use crate::{build_request_url, ControlId, Effect, Msg, RefreshState, RequestError, RequestOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: RefreshState, msg: Msg) -> (RefreshState, Vec<Effect>) {
    let effects = match msg {
        Msg::ControlBound { control_id, spec } => {
            state.bind(control_id, spec);
            Vec::new()
        }
        Msg::Clicked { control_id } => start_request(&mut state, control_id),
        Msg::RequestFinished {
            control_id,
            outcome,
        } => finish_request(&mut state, control_id, outcome),
    };

    (state, effects)
}

fn start_request(state: &mut RefreshState, control_id: ControlId) -> Vec<Effect> {
    let Some(control) = state.control(control_id) else {
        return Vec::new();
    };
    // A disabled control does not receive activation.
    if control.disabled {
        return Vec::new();
    }

    let url = match state.page_url() {
        Some(page_url) => build_request_url(
            page_url,
            &state.config().endpoint,
            &control.spec.refresh_type,
        ),
        None => Err(RequestError::MissingPageUrl),
    };
    let url = match url {
        Ok(url) => url.to_string(),
        Err(err) => {
            return vec![Effect::Alert {
                message: state.config().failure_message(&err.to_string()),
            }];
        }
    };

    let busy = state.config().label_style.busy_label(&control.label);
    let Some(control) = state.control_mut(control_id) else {
        return Vec::new();
    };
    control.idle_label = Some(std::mem::replace(&mut control.label, busy.clone()));
    control.disabled = true;

    vec![
        Effect::SetLabel {
            control_id,
            label: busy,
        },
        Effect::SendRequest { control_id, url },
    ]
}

fn finish_request(
    state: &mut RefreshState,
    control_id: ControlId,
    outcome: RequestOutcome,
) -> Vec<Effect> {
    let Some(control) = state.control_mut(control_id) else {
        return Vec::new();
    };
    // Completion runs exactly once per click.
    let Some(idle_label) = control.idle_label.take() else {
        return Vec::new();
    };
    control.label = idle_label.clone();
    control.disabled = false;
    let targets = control.spec.effective_targets();

    let mut effects = Vec::with_capacity(2);
    match outcome {
        RequestOutcome::Success { body } => effects.push(Effect::Splice {
            control_id,
            body,
            targets,
        }),
        RequestOutcome::Failure(err) => effects.push(Effect::Alert {
            message: state.config().failure_message(&err.message),
        }),
    }
    effects.push(Effect::SetLabel {
        control_id,
        label: idle_label,
    });
    effects
}
