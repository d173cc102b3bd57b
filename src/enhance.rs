//! Content enhancers - optional post-render widget upgraders
//!
//! Applied opportunistically after reveal to content carrying a recognized
//! marker; a missing enhancer is not an error.

/// Marker for rich-text editor regions
pub const RICH_TEXT_MARKER: &str = r#"data-provide="markdown""#;

/// Marker for multi-select fields
pub const MULTISELECT_MARKER: &str = "multiple";

/// Upgrades recognized widgets inside revealed content
pub trait Enhancer {
    fn name(&self) -> &str;

    /// Substring the content must contain for this enhancer to apply
    fn marker(&self) -> &str;

    /// Whether the revealed content carries this enhancer's marker
    fn wants(&self, html: &str) -> bool {
        html.contains(self.marker())
    }

    /// Upgrade the matching widgets (side effect on the host's rendering)
    fn apply(&self, html: &str);
}
