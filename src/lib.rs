//! quickpanel - a slide-in panel overlay controller
//!
//! One singleton overlay bound to one mount point: it fetches remote
//! `{title, html}` content, renders it into a shell, binds any contained
//! form, submits that form in the background, and manages its own lifecycle
//! including a dirty-state close guard and a load-timeout watchdog.
//!
//! The controller is headless. It owns the panel's logical state
//! ([`model::ShellState`] classes, title, content region, page flags) and
//! talks to everything else through narrow trait seams: [`loader::ContentLoader`],
//! [`bridge::FormBridge`], [`dirty::DirtyTracker`], the notification,
//! confirmation, and translation services in [`notify`], and optional
//! content [`enhance::Enhancer`]s. A host renders the shell state and feeds
//! clicks, key presses, and field edits back in.
//!
//! ```no_run
//! use quickpanel::{markup::Trigger, OpenOptions, Panel, Source};
//!
//! let mut panel = Panel::new();
//! let trigger = Trigger::new().with_href("/items/5/edit");
//! panel.open(Source::Element(trigger), OpenOptions::default());
//!
//! // ...on every event-loop tick:
//! panel.pump();
//! ```

pub mod bridge;
pub mod commands;
pub mod config;
pub mod dirty;
pub mod enhance;
pub mod loader;
pub mod markup;
pub mod messages;
pub mod model;
pub mod notify;
pub mod panel;
pub mod timer;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::{OpenOptions, PanelDefaults, PanelPosition, PanelTiming};
pub use messages::{DirtyState, PanelEvent, PanelMsg};
pub use model::PanelModel;
pub use panel::{Panel, PanelBuilder, Source};
