//! Panel configuration: placement variants, per-open options, and the
//! presentation timing constants the lifecycle depends on.

use std::time::Duration;

use crate::model::{CloseHook, FormSuccessHook, RevealHook};

/// Placement variant applied to the shell as a display class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPosition {
    #[default]
    FromRight,
    FromLeft,
    FromTop,
    FromBottom,
}

impl PanelPosition {
    /// The display class the host applies to the shell element
    pub fn as_class(&self) -> &'static str {
        match self {
            PanelPosition::FromRight => "from-right",
            PanelPosition::FromLeft => "from-left",
            PanelPosition::FromTop => "from-top",
            PanelPosition::FromBottom => "from-bottom",
        }
    }

    /// Parse a position from its class name (used by the markup data-API)
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "from-right" => Some(PanelPosition::FromRight),
            "from-left" => Some(PanelPosition::FromLeft),
            "from-top" => Some(PanelPosition::FromTop),
            "from-bottom" => Some(PanelPosition::FromBottom),
            _ => None,
        }
    }
}

/// Fallback values merged under the per-open options
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelDefaults {
    pub position: PanelPosition,
    pub reload_on_success: bool,
}

/// Per-open options; unset fields fall back to [`PanelDefaults`]
#[derive(Default)]
pub struct OpenOptions {
    /// Placement variant applied as a display class
    pub position: Option<PanelPosition>,
    /// Perform a full page reload after a successful form submission
    pub reload_on_success: Option<bool>,
    /// Invoked after content is revealed, with the shell state
    pub on_reveal: Option<RevealHook>,
    /// Invoked once close teardown completes
    pub on_close: Option<CloseHook>,
    /// Invoked with the success payload and submitted form
    pub on_form_success: Option<FormSuccessHook>,
}

impl OpenOptions {
    pub fn position(mut self, position: PanelPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn reload_on_success(mut self, reload: bool) -> Self {
        self.reload_on_success = Some(reload);
        self
    }

    pub fn on_reveal(mut self, hook: RevealHook) -> Self {
        self.on_reveal = Some(hook);
        self
    }

    pub fn on_close(mut self, hook: CloseHook) -> Self {
        self.on_close = Some(hook);
        self
    }

    pub fn on_form_success(mut self, hook: FormSuccessHook) -> Self {
        self.on_form_success = Some(hook);
        self
    }
}

impl std::fmt::Debug for OpenOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenOptions")
            .field("position", &self.position)
            .field("reload_on_success", &self.reload_on_success)
            .field("on_reveal", &self.on_reveal.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_form_success", &self.on_form_success.is_some())
            .finish()
    }
}

/// Options merged over defaults for one open cycle
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelConfig {
    pub position: PanelPosition,
    pub reload_on_success: bool,
}

impl PanelConfig {
    pub fn merge(defaults: &PanelDefaults, options: &OpenOptions) -> Self {
        Self {
            position: options.position.unwrap_or(defaults.position),
            reload_on_success: options
                .reload_on_success
                .unwrap_or(defaults.reload_on_success),
        }
    }
}

/// Lifecycle timing.
///
/// `close_animation` must match the CSS slide-out duration, and
/// `reload_delay` exists solely so that animation is visible before a full
/// page reload. Presentation constants, not protocol ones.
#[derive(Debug, Clone, Copy)]
pub struct PanelTiming {
    /// Delay before the "is-visible" transition class is applied, so the
    /// shell paints once in its pre-transition state
    pub transition_kickoff: Duration,
    /// How long a content load may take before it is treated as failed
    pub watchdog: Duration,
    /// Close animation duration; teardown completes after it
    pub close_animation: Duration,
    /// Pause between close and the page reload requested by a submission
    pub reload_delay: Duration,
}

impl Default for PanelTiming {
    fn default() -> Self {
        Self {
            transition_kickoff: Duration::from_millis(1),
            watchdog: Duration::from_millis(4000),
            close_animation: Duration::from_millis(400),
            reload_delay: Duration::from_millis(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_explicit_options() {
        let defaults = PanelDefaults {
            position: PanelPosition::FromRight,
            reload_on_success: false,
        };
        let options = OpenOptions::default()
            .position(PanelPosition::FromLeft)
            .reload_on_success(true);

        let config = PanelConfig::merge(&defaults, &options);
        assert_eq!(config.position, PanelPosition::FromLeft);
        assert!(config.reload_on_success);
    }

    #[test]
    fn merge_falls_back_to_defaults() {
        let defaults = PanelDefaults {
            position: PanelPosition::FromBottom,
            reload_on_success: true,
        };
        let config = PanelConfig::merge(&defaults, &OpenOptions::default());
        assert_eq!(config.position, PanelPosition::FromBottom);
        assert!(config.reload_on_success);
    }

    #[test]
    fn position_class_round_trip() {
        for pos in [
            PanelPosition::FromRight,
            PanelPosition::FromLeft,
            PanelPosition::FromTop,
            PanelPosition::FromBottom,
        ] {
            assert_eq!(PanelPosition::from_class(pos.as_class()), Some(pos));
        }
        assert_eq!(PanelPosition::from_class("sideways"), None);
    }
}
