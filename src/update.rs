//! Lifecycle state machine
//!
//! All state transitions flow through these functions. Entry points mutate
//! the model and return commands for the controller to execute; asynchronous
//! completions re-enter through [`apply`]. Guards live at the top of each
//! entry point: duplicate opens and closes are silent no-ops, and stale
//! completions are dropped by epoch comparison at resolution time.

use crate::commands::{Cmd, TimerKind};
use crate::config::PanelConfig;
use crate::loader::ContentRequest;
use crate::messages::{DirtyState, PanelEvent, PanelMsg};
use crate::model::{ContentRegion, FormMarker, FormSnapshot, FormState, PanelCallbacks, PanelModel};
use crate::notify::{keys, NoticeStyle, NoticeText};
use crate::timer::TimerHandle;

fn disarm(slot: &mut Option<TimerHandle>) {
    if let Some(timer) = slot.take() {
        timer.cancel();
    }
}

/// Begin an open cycle: reset state, show the shell, render the loading
/// placeholder. Returns `None` (no side effects at all) when already active.
/// The caller dispatches the content source and emits the opened event.
pub fn open_shell(
    model: &mut PanelModel,
    config: PanelConfig,
    callbacks: PanelCallbacks,
) -> Option<Cmd> {
    if model.active {
        tracing::debug!("open ignored: panel already active");
        return None;
    }

    let mut cmds = Vec::new();

    // A pending teardown from the previous cycle is superseded by this open;
    // run it now so close callbacks and events keep their ordering.
    if model.closing {
        if let Some(cmd) = finish_close(model) {
            cmds.push(cmd);
        }
    }

    model.epoch += 1;
    model.active = true;
    model.config = config;
    model.callbacks = callbacks;
    model.form = None;

    model.shell.visible = true;
    model.shell.position = Some(config.position);
    model.shell.in_view = false;
    model.shell.loaded = false;
    model.shell.form_marker = None;
    model.shell.title.clear();
    model.shell.content = ContentRegion::Loading;

    model.page.panel_open = true;
    model.escape_bound = true;

    // The shell must paint once in its pre-transition state before the
    // "is-visible" class lands, so the slide-in can animate.
    cmds.push(Cmd::ArmTimer {
        kind: TimerKind::TransitionKickoff,
        epoch: model.epoch,
    });

    Cmd::batch(cmds)
}

/// Issue the content fetch and arm the watchdog
pub fn load(model: &mut PanelModel, url: &str, partial: Option<String>) -> Option<Cmd> {
    if !model.active {
        tracing::warn!(url, "load ignored: panel not open");
        return None;
    }
    if model.pending.is_some() {
        tracing::warn!(url, "load ignored: a request is already in flight");
        return None;
    }

    Cmd::batch(vec![
        Cmd::StartLoad {
            request: ContentRequest::new(url, partial),
            epoch: model.epoch,
        },
        Cmd::ArmTimer {
            kind: TimerKind::Watchdog,
            epoch: model.epoch,
        },
    ])
}

/// Render fetched content and bind any contained form.
///
/// The watchdog is disarmed before anything else, so a late firing can never
/// race a completed reveal. A response arriving after close is dropped.
pub fn reveal(
    model: &mut PanelModel,
    title: String,
    html: String,
    form: Option<FormSnapshot>,
) -> Option<Cmd> {
    disarm(&mut model.watchdog);

    if !model.active {
        tracing::debug!("dropping content revealed after close");
        return None;
    }

    model.pending = None;
    model.shell.loaded = true;
    model.shell.title = title;
    model.shell.content = ContentRegion::Html(html.clone());

    setup_form(model, form);

    if let Some(mut hook) = model.callbacks.on_reveal.take() {
        hook(&model.shell);
        model.callbacks.on_reveal = Some(hook);
    }

    Cmd::batch(vec![
        Cmd::ApplyEnhancers { html },
        Cmd::Emit(PanelEvent::Revealed),
    ])
}

/// Content without a form is a valid content type, not an error
fn setup_form(model: &mut PanelModel, form: Option<FormSnapshot>) {
    match form {
        None => model.shell.form_marker = Some(FormMarker::NoForm),
        Some(snapshot) => {
            model.shell.form_marker = Some(FormMarker::WithForm);
            // Submit trigger stays disabled until the form goes dirty
            model.form = Some(FormState::bound(snapshot));
        }
    }
}

/// A dirty/clean transition from the tracker: the submit trigger is enabled
/// only while dirty
pub fn dirty_changed(model: &mut PanelModel, state: DirtyState) -> Option<Cmd> {
    let form = model.form.as_mut()?;
    form.dirty = matches!(state, DirtyState::Dirty);
    form.submit_enabled = form.dirty;
    None
}

/// Begin a form submission: loading indicator on, controls disabled
pub fn submit(model: &mut PanelModel) -> Option<Cmd> {
    if !model.active {
        tracing::debug!("submit ignored: panel not active");
        return None;
    }
    let Some(form) = model.form.as_mut() else {
        tracing::debug!("submit ignored: no form bound");
        return None;
    };
    if form.submitting {
        tracing::debug!("submit ignored: submission already in flight");
        return None;
    }

    form.submitting = true;
    form.controls_disabled = true;
    model.page.loader_visible = true;

    Some(Cmd::SubmitForm {
        form: form.snapshot.clone(),
    })
}

/// Submission resolved. The completion contract (loading indicator off,
/// controls re-enabled) runs on both outcomes, even when the panel has since
/// closed; the success branch is guarded by current state instead of epochs.
pub fn submit_finished(
    model: &mut PanelModel,
    form: FormSnapshot,
    success: Option<serde_json::Value>,
) -> Option<Cmd> {
    model.page.loader_visible = false;
    if let Some(state) = model.form.as_mut() {
        state.controls_disabled = false;
        state.submitting = false;
    }

    let payload = success?;

    if let Some(mut hook) = model.callbacks.on_form_success.take() {
        hook(&payload, &form);
        model.callbacks.on_form_success = Some(hook);
    }

    let mut cmds = Vec::new();

    // The transport layer surfaces payload-supplied messages itself; only
    // fall back to the default wording when none is present.
    if payload.get("message").and_then(|m| m.as_str()).is_none() {
        let key = if form.method_override().is_some() {
            keys::UPDATE_SUCCESS
        } else {
            keys::CREATE_SUCCESS
        };
        cmds.push(Cmd::Notify {
            text: NoticeText::Key(key),
            style: NoticeStyle::Success,
            sticky: false,
        });
    }

    // The form just succeeded; the dirty guard no longer applies
    let close_cmd = close(model, true);

    if model.config.reload_on_success {
        if model.closing {
            // Deferred until teardown completes, so the close animation is
            // visible before the page reloads
            model.reload_requested = true;
        } else {
            cmds.push(Cmd::ArmTimer {
                kind: TimerKind::ReloadDelay,
                epoch: model.epoch,
            });
        }
    }

    cmds.extend(close_cmd);
    Cmd::batch(cmds)
}

/// Begin closing. Unforced closes of a dirty form divert to the confirmation
/// flow and leave the panel open.
pub fn close(model: &mut PanelModel, force: bool) -> Option<Cmd> {
    disarm(&mut model.watchdog);

    if !model.active {
        tracing::debug!("close ignored: panel not active");
        return None;
    }

    if !force && model.is_dirty() {
        return Some(Cmd::AskConfirm { epoch: model.epoch });
    }

    // Drop the transition classes so the close animation plays
    model.shell.in_view = false;
    model.shell.loaded = false;
    disarm(&mut model.kickoff);

    // Unbind the form immediately; teardown of the rest waits for the
    // animation
    model.form = None;
    model.active = false;
    model.closing = true;
    model.page.panel_open = false;
    model.escape_bound = false;

    if let Some(pending) = model.pending.take() {
        pending.abort();
    }

    // Everything still in flight for the old cycle is now stale
    model.epoch += 1;

    Some(Cmd::ArmTimer {
        kind: TimerKind::CloseFinish,
        epoch: model.epoch,
    })
}

/// Teardown after the close animation: hide the shell, strip classes, fire
/// the close callback and event, clear callbacks
fn finish_close(model: &mut PanelModel) -> Option<Cmd> {
    disarm(&mut model.close_timer);
    model.closing = false;

    model.shell.visible = false;
    model.shell.position = None;
    model.shell.in_view = false;
    model.shell.loaded = false;
    model.shell.form_marker = None;
    model.shell.title.clear();

    if let Some(mut hook) = model.callbacks.on_close.take() {
        hook();
    }
    model.callbacks.clear();

    let mut cmds = Vec::new();
    if model.reload_requested {
        model.reload_requested = false;
        cmds.push(Cmd::ArmTimer {
            kind: TimerKind::ReloadDelay,
            epoch: model.epoch,
        });
    }
    cmds.push(Cmd::Emit(PanelEvent::Closed));
    Cmd::batch(cmds)
}

/// Load failure (transport error or watchdog timeout): persistent error
/// notice, then force-close
pub fn failed(model: &mut PanelModel, message: Option<String>) -> Option<Cmd> {
    let text = match message {
        Some(message) => NoticeText::Literal(message),
        None => NoticeText::Key(keys::UNABLE_TO_LOAD),
    };

    let mut cmds = vec![Cmd::Notify {
        text,
        style: NoticeStyle::Error,
        sticky: true,
    }];
    cmds.extend(close(model, true));
    Cmd::batch(cmds)
}

/// Dispatch an asynchronous completion.
///
/// `LoadFinished` is resolved by the controller (the form bridge has to
/// inspect the fetched content) before reaching this function.
pub fn apply(model: &mut PanelModel, msg: PanelMsg) -> Option<Cmd> {
    match msg {
        PanelMsg::LoadFinished { .. } => None,

        PanelMsg::WatchdogFired { epoch } => {
            if epoch != model.epoch || model.watchdog.is_none() {
                tracing::debug!("dropping stale watchdog firing");
                return None;
            }
            model.watchdog = None;
            tracing::warn!("content load timed out");
            failed(model, None)
        }

        PanelMsg::TransitionTick { epoch } => {
            if epoch != model.epoch {
                return None;
            }
            model.kickoff = None;
            if model.active && model.shell.visible {
                model.shell.in_view = true;
            }
            None
        }

        PanelMsg::CloseFinished { epoch } => {
            if epoch != model.epoch || !model.closing {
                tracing::debug!("dropping stale close completion");
                return None;
            }
            finish_close(model)
        }

        PanelMsg::ReloadDue => {
            if model.reload_timer.take().is_none() {
                tracing::debug!("dropping stray reload tick");
                return None;
            }
            Some(Cmd::ReloadPage)
        }

        PanelMsg::SubmitFinished { form, outcome } => match outcome {
            crate::bridge::SubmitOutcome::Success { payload } => {
                submit_finished(model, form, Some(payload))
            }
            crate::bridge::SubmitOutcome::Failure { error } => {
                tracing::warn!(%error, action = %form.action, "form submission failed");
                submit_finished(model, form, None)
            }
        },

        PanelMsg::ConfirmAnswered { epoch, confirmed } => {
            if epoch != model.epoch {
                tracing::debug!("dropping stale confirmation answer");
                return None;
            }
            if !confirmed {
                tracing::debug!("close declined; panel stays open");
                return None;
            }
            close(model, true)
        }
    }
}
