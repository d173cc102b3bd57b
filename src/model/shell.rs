//! Shell state - the visible panel container (header + content region)
//!
//! The controller is headless: this is the logical rendering state a host
//! mirrors onto its real UI. `classes()` yields the display classes in the
//! order a host would apply them.

use crate::config::PanelPosition;

/// What the content region currently holds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentRegion {
    /// Nothing rendered yet
    #[default]
    Empty,
    /// Interim loading placeholder; the host renders a spinner plus a cancel
    /// affordance wired to the close data-API
    Loading,
    /// Fetched content, injected verbatim
    Html(String),
}

/// Whether revealed content contained a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMarker {
    WithForm,
    NoForm,
}

impl FormMarker {
    pub fn as_class(&self) -> &'static str {
        match self {
            FormMarker::WithForm => "with-form",
            FormMarker::NoForm => "no-form",
        }
    }
}

/// The visible panel container state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellState {
    /// Shell element shown at all (display toggle, not the slide transition)
    pub visible: bool,
    /// Placement class applied for this open cycle
    pub position: Option<PanelPosition>,
    /// "is-visible" transition class; applied one tick after `visible` so the
    /// slide-in animates from the pre-transition state
    pub in_view: bool,
    /// "loaded" class; set once content is revealed
    pub loaded: bool,
    /// "with-form" / "no-form" class
    pub form_marker: Option<FormMarker>,
    /// Header title text
    pub title: String,
    /// Content region
    pub content: ContentRegion,
}

impl ShellState {
    /// Display classes in application order
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if let Some(position) = self.position {
            classes.push(position.as_class());
        }
        if self.in_view {
            classes.push("is-visible");
        }
        if self.loaded {
            classes.push("loaded");
        }
        if let Some(marker) = self.form_marker {
            classes.push(marker.as_class());
        }
        classes
    }

    /// The revealed content, if any
    pub fn html(&self) -> Option<&str> {
        match &self.content {
            ContentRegion::Html(html) => Some(html),
            _ => None,
        }
    }
}
