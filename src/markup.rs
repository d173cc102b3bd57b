//! Declarative markup contract - the data-API
//!
//! Elements carry a `data-panel` marker attribute (`open` or `close`), an
//! optional anchor link target supplying the source URL, and optional data
//! attributes mapped onto the per-open options bag.

use std::collections::BTreeMap;

use crate::config::{OpenOptions, PanelPosition};
use crate::panel::{Panel, Source};

/// Dataset key carrying the marker (`data-panel`)
pub const PANEL_KEY: &str = "panel";
pub const OPEN_MARKER: &str = "open";
pub const CLOSE_MARKER: &str = "close";

/// Dataset key for the placement variant (`data-pos`)
pub const POSITION_KEY: &str = "pos";
/// Dataset key for the reload-after-success flag (`data-reload`)
pub const RELOAD_KEY: &str = "reload";

/// A clicked element, reduced to what the panel needs: the resolved link
/// target of its nearest anchor and its data attributes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trigger {
    href: Option<String>,
    dataset: BTreeMap<String, String>,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dataset.insert(key.into(), value.into());
        self
    }

    /// The source URL resolved from the nearest anchor
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    /// The `data-panel` marker value
    pub fn marker(&self) -> Option<&str> {
        self.data(PANEL_KEY)
    }

    /// Map data attributes onto the options bag
    pub fn options(&self) -> OpenOptions {
        let mut options = OpenOptions::default();
        if let Some(pos) = self.data(POSITION_KEY) {
            match PanelPosition::from_class(pos) {
                Some(position) => options.position = Some(position),
                None => tracing::warn!(pos, "unrecognized panel position"),
            }
        }
        if let Some(reload) = self.data(RELOAD_KEY) {
            options.reload_on_success = Some(matches!(reload, "true" | "1"));
        }
        options
    }
}

/// Data-API dispatch for a click. Returns true when the click was consumed
/// and the originating UI action should be suppressed.
pub fn dispatch_click(panel: &mut Panel, trigger: &Trigger) -> bool {
    match trigger.marker() {
        Some(OPEN_MARKER) => {
            panel.open(Source::Element(trigger.clone()), trigger.options());
            true
        }
        Some(CLOSE_MARKER) => {
            panel.close(false);
            true
        }
        _ => false,
    }
}
