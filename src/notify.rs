//! Notification, confirmation, translation, and page-navigation seams
//!
//! Thin interfaces over the page chrome: toast rendering, the yes/no dialog
//! guarding dirty closes, localized message lookup, and the full page reload.

use std::time::Duration;

/// Message keys the panel resolves through [`Translations`]
pub mod keys {
    /// Cancel affordance label in the loading placeholder
    pub const CANCEL: &str = "buttons.Cancel";
    /// Default load-failure message
    pub const UNABLE_TO_LOAD: &str = "messages.Unable to load page";
    /// Dirty-close confirmation question
    pub const CLOSE_CONFIRM: &str = "messages.Are you sure you want to close this?";
    /// Default success message when the method hint indicates an update
    pub const UPDATE_SUCCESS: &str = "messages.Update successful";
    /// Default success message for a create
    pub const CREATE_SUCCESS: &str = "messages.Creation successful";
}

/// Auto-dismiss delay for non-sticky notices
pub const NOTICE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Notice body: literal text, or a key resolved at surfacing time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeText {
    Literal(String),
    Key(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Success,
    Error,
}

/// A rendered toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub style: NoticeStyle,
    /// `None` means persistent; the notice never auto-dismisses
    pub timeout: Option<Duration>,
}

/// Surfaces success/error toasts
pub trait NotificationService {
    fn notify(&self, notice: Notice);
}

/// Default notifier: logs notices through `tracing`
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationService for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.style {
            NoticeStyle::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeStyle::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}

/// Asks a yes/no question; the answer arrives asynchronously
pub trait ConfirmationService {
    fn confirm(&self, prompt: String, answer: Box<dyn FnOnce(bool) + Send>);
}

/// Stand-in confirmer that immediately answers yes. Replace with a real
/// dialog in any host where unsaved edits matter.
#[derive(Debug, Default)]
pub struct AlwaysConfirm;

impl ConfirmationService for AlwaysConfirm {
    fn confirm(&self, _prompt: String, answer: Box<dyn FnOnce(bool) + Send>) {
        answer(true);
    }
}

/// Localized message lookup
pub trait Translations {
    fn translate(&self, key: &str) -> String;
}

/// Default lookup: the English phrasing behind each known key; unknown keys
/// pass through unchanged
#[derive(Debug, Default)]
pub struct EnglishMessages;

impl Translations for EnglishMessages {
    fn translate(&self, key: &str) -> String {
        match key {
            keys::CANCEL => "Cancel",
            keys::UNABLE_TO_LOAD => "Unable to load page",
            keys::CLOSE_CONFIRM => "Are you sure you want to close this?",
            keys::UPDATE_SUCCESS => "Update successful",
            keys::CREATE_SUCCESS => "Creation successful",
            other => other,
        }
        .to_string()
    }
}

/// Page navigation seam for the deferred post-submission reload
pub trait Navigator {
    fn reload_page(&self);
}

/// Default navigator: records nothing, reloads nothing
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn reload_page(&self) {
        tracing::debug!("page reload requested with no navigator attached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_messages_cover_known_keys() {
        let messages = EnglishMessages;
        assert_eq!(messages.translate(keys::CANCEL), "Cancel");
        assert_eq!(messages.translate(keys::UNABLE_TO_LOAD), "Unable to load page");
        assert_eq!(messages.translate(keys::UPDATE_SUCCESS), "Update successful");
        assert_eq!(messages.translate(keys::CREATE_SUCCESS), "Creation successful");
        assert_eq!(
            messages.translate(keys::CLOSE_CONFIRM),
            "Are you sure you want to close this?"
        );
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert_eq!(EnglishMessages.translate("messages.Custom"), "messages.Custom");
    }
}
