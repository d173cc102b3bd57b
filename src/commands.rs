//! Command types for the panel lifecycle
//!
//! Commands describe side effects the controller performs after a state
//! transition: network fetches, timers, notifications, lifecycle events.

use crate::loader::ContentRequest;
use crate::messages::PanelEvent;
use crate::model::FormSnapshot;
use crate::notify::{NoticeStyle, NoticeText};

/// Lifecycle timers; at most one of each is armed at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Next-tick delay before the "is-visible" transition class
    TransitionKickoff,
    /// Load watchdog
    Watchdog,
    /// Close animation duration
    CloseFinish,
    /// Pause between close and page reload
    ReloadDelay,
}

/// Side effects to perform after an update
#[derive(Debug)]
pub enum Cmd {
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),
    /// Start the content fetch; the handle becomes the pending request
    StartLoad { request: ContentRequest, epoch: u64 },
    /// Arm a lifecycle timer tagged with the current epoch
    ArmTimer { kind: TimerKind, epoch: u64 },
    /// Submit the serialized form via the form bridge
    SubmitForm { form: FormSnapshot },
    /// Surface a notification toast
    Notify {
        text: NoticeText,
        style: NoticeStyle,
        /// Persistent notices never auto-dismiss
        sticky: bool,
    },
    /// Ask the confirmation service whether to discard unsaved edits
    AskConfirm { epoch: u64 },
    /// Run registered enhancers against revealed content
    ApplyEnhancers { html: String },
    /// Notify lifecycle observers
    Emit(PanelEvent),
    /// Perform the full page reload a successful submission requested
    ReloadPage,
}

impl Cmd {
    /// Collapse a command list, avoiding a Batch wrapper for a single entry
    pub fn batch(mut cmds: Vec<Cmd>) -> Option<Cmd> {
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }
}
