//! Message types for the panel lifecycle
//!
//! Every asynchronous completion (load result, timer firing, submission
//! outcome, confirmation answer) re-enters the state machine as one of these.

use crate::bridge::SubmitOutcome;
use crate::loader::ContentPayload;
use crate::model::FormSnapshot;

/// Asynchronous completions delivered over the controller's channel
#[derive(Debug, Clone)]
pub enum PanelMsg {
    /// The content fetch resolved (async result)
    LoadFinished {
        epoch: u64,
        result: Result<ContentPayload, String>,
    },
    /// The load watchdog elapsed before reveal or close
    WatchdogFired { epoch: u64 },
    /// Next-tick delay elapsed; apply the "is-visible" transition class
    TransitionTick { epoch: u64 },
    /// Close animation elapsed; finish teardown
    CloseFinished { epoch: u64 },
    /// Post-close pause elapsed; perform the requested page reload
    ReloadDue,
    /// The form submission resolved (async result)
    SubmitFinished {
        form: FormSnapshot,
        outcome: SubmitOutcome,
    },
    /// The close-confirmation dialog was answered
    ConfirmAnswered { epoch: u64, confirmed: bool },
}

/// Process-wide lifecycle notifications (fire-and-observe)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Opened,
    Revealed,
    Closed,
}

/// Reported by the dirty tracker on each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyState {
    Clean,
    Dirty,
}
