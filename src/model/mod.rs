//! Panel model - the complete state of the overlay
//!
//! One model instance is created with the controller and reused across
//! open/close cycles for the life of the page.

pub mod form;
pub mod shell;

pub use form::{FormField, FormSnapshot, FormState, METHOD_OVERRIDE_FIELD};
pub use shell::{ContentRegion, FormMarker, ShellState};

use serde_json::Value;

use crate::config::PanelConfig;
use crate::loader::LoadHandle;
use crate::timer::TimerHandle;

/// Invoked after content is revealed
pub type RevealHook = Box<dyn FnMut(&ShellState)>;
/// Invoked once close teardown completes
pub type CloseHook = Box<dyn FnMut()>;
/// Invoked with the submission success payload and the submitted form
pub type FormSuccessHook = Box<dyn FnMut(&Value, &FormSnapshot)>;

/// Per-open-cycle callbacks; cleared at close teardown so stale references
/// cannot leak into the next cycle
#[derive(Default)]
pub struct PanelCallbacks {
    pub on_reveal: Option<RevealHook>,
    pub on_close: Option<CloseHook>,
    pub on_form_success: Option<FormSuccessHook>,
}

impl PanelCallbacks {
    pub fn clear(&mut self) {
        self.on_reveal = None;
        self.on_close = None;
        self.on_form_success = None;
    }
}

impl std::fmt::Debug for PanelCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelCallbacks")
            .field("on_reveal", &self.on_reveal.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_form_success", &self.on_form_success.is_some())
            .finish()
    }
}

/// Page-level flags the panel maintains outside its own shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageState {
    /// "panel-open" marker on the page body
    pub panel_open: bool,
    /// Global loading indicator shown while a submission is in flight
    pub loader_visible: bool,
}

/// The complete panel state
#[derive(Debug, Default)]
pub struct PanelModel {
    /// True from `open` until close begins; duplicate open/close guard
    pub active: bool,
    /// Bumped on every open and close-begin; async completions carry the
    /// epoch they were issued under and are dropped when stale
    pub epoch: u64,
    /// Options merged over defaults for the current cycle
    pub config: PanelConfig,
    pub shell: ShellState,
    pub page: PageState,
    /// The form bound in revealed content, if any
    pub form: Option<FormState>,
    /// Escape closes the panel only while bound
    pub escape_bound: bool,
    /// The in-flight content load; at most one at a time
    pub pending: Option<LoadHandle>,
    /// Watchdog armed for every load; disarmed on reveal or close
    pub watchdog: Option<TimerHandle>,
    /// Next-tick timer for the "is-visible" transition class
    pub kickoff: Option<TimerHandle>,
    /// Teardown timer armed when close begins
    pub close_timer: Option<TimerHandle>,
    /// Deferred page-reload timer armed by a successful submission
    pub reload_timer: Option<TimerHandle>,
    /// A successful submission asked for a page reload once teardown ends
    pub reload_requested: bool,
    pub callbacks: PanelCallbacks,
    /// Between close-begin and teardown completion
    pub closing: bool,
}

impl PanelModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the dirty tracker reported unsaved edits
    pub fn is_dirty(&self) -> bool {
        self.form.as_ref().is_some_and(|f| f.dirty)
    }
}
