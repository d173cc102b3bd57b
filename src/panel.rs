//! The panel controller
//!
//! Owns the model, the injected collaborators, and the message channel.
//! Entry points run a state transition and execute the resulting commands;
//! worker threads (fetches, submissions, timers) post completions back
//! through the channel, drained by `pump()` on the host's event loop.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::bridge::{FormBridge, HttpFormBridge};
use crate::commands::{Cmd, TimerKind};
use crate::config::{OpenOptions, PanelConfig, PanelDefaults, PanelTiming};
use crate::dirty::{BaselineDirtyTracker, DirtyTracker};
use crate::enhance::Enhancer;
use crate::loader::{ContentLoader, HttpContentLoader};
use crate::markup::Trigger;
use crate::messages::{PanelEvent, PanelMsg};
use crate::model::{FormField, PanelCallbacks, PanelModel, ShellState};
use crate::notify::{
    keys, AlwaysConfirm, ConfirmationService, EnglishMessages, LogNotifier, Navigator,
    NoopNavigator, Notice, NoticeText, NotificationService, Translations, NOTICE_TIMEOUT,
};
use crate::timer;
use crate::update;

/// Content-producing function invoked with the controller and the merged
/// per-open config; it drives the reveal itself
pub type ContentFn = Box<dyn FnOnce(&mut Panel, &PanelConfig)>;

/// What an open call loads
pub enum Source {
    /// Custom loader function
    Loader(ContentFn),
    /// Triggering element; the URL is resolved from its link target
    Element(Trigger),
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Loader(_) => f.write_str("Source::Loader"),
            Source::Element(trigger) => f.debug_tuple("Source::Element").field(trigger).finish(),
        }
    }
}

/// Lifecycle observer; receives the event plus the shell it concerns
pub type EventObserver = Box<dyn Fn(PanelEvent, &ShellState)>;

/// The slide-in panel controller. Construct once via [`Panel::builder`] and
/// keep for the life of the page; state is reused across open/close cycles.
pub struct Panel {
    model: PanelModel,
    defaults: PanelDefaults,
    timing: PanelTiming,
    loader: Box<dyn ContentLoader>,
    bridge: Box<dyn FormBridge>,
    tracker: Box<dyn DirtyTracker>,
    notifier: Box<dyn NotificationService>,
    confirmer: Box<dyn ConfirmationService>,
    translator: Box<dyn Translations>,
    navigator: Box<dyn Navigator>,
    enhancers: Vec<Box<dyn Enhancer>>,
    observers: Vec<EventObserver>,
    msg_tx: Sender<PanelMsg>,
    msg_rx: Receiver<PanelMsg>,
}

impl Panel {
    pub fn builder() -> PanelBuilder {
        PanelBuilder::default()
    }

    /// A panel with all default collaborators
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Current panel state, for host rendering and inspection
    pub fn model(&self) -> &PanelModel {
        &self.model
    }

    /// The visible shell state
    pub fn shell(&self) -> &ShellState {
        &self.model.shell
    }

    /// Replace the fallback options merged under every open call
    pub fn set_defaults(&mut self, defaults: PanelDefaults) {
        self.defaults = defaults;
    }

    /// Register a lifecycle observer (opened / revealed / closed)
    pub fn observe(&mut self, observer: impl Fn(PanelEvent, &ShellState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Open the panel and start loading content. A duplicate open while
    /// active is a silent no-op.
    pub fn open(&mut self, source: Source, options: OpenOptions) {
        let config = PanelConfig::merge(&self.defaults, &options);
        let callbacks = PanelCallbacks {
            on_reveal: options.on_reveal,
            on_close: options.on_close,
            on_form_success: options.on_form_success,
        };

        let Some(cmd) = update::open_shell(&mut self.model, config, callbacks) else {
            return;
        };
        self.exec(cmd);

        match source {
            Source::Element(trigger) => match trigger.href() {
                Some(url) => {
                    let url = url.to_string();
                    self.load(&url, None);
                }
                None => {
                    tracing::warn!("trigger has no resolvable link target");
                    if let Some(cmd) = update::failed(&mut self.model, None) {
                        self.exec(cmd);
                    }
                }
            },
            Source::Loader(produce) => produce(self, &config),
        }

        self.exec(Cmd::Emit(PanelEvent::Opened));
    }

    /// Fetch content into the open panel. Rejected while another request is
    /// in flight.
    pub fn load(&mut self, url: &str, partial: Option<String>) {
        if let Some(cmd) = update::load(&mut self.model, url, partial) {
            self.exec(cmd);
        }
    }

    /// Render content into the open panel, binding any contained form.
    /// Public so custom loader functions can drive the reveal.
    pub fn reveal(&mut self, title: impl Into<String>, html: impl Into<String>) {
        let html = html.into();
        let form = self.bridge.extract(&html);
        if let Some(cmd) = update::reveal(&mut self.model, title.into(), html, form) {
            if let Some(state) = self.model.form.as_ref() {
                self.tracker.bind(&state.snapshot);
            }
            self.exec(cmd);
        }
    }

    /// Record a form field edit; dirty/clean transitions toggle the submit
    /// trigger and arm the close guard
    pub fn field_edited(&mut self, name: &str, value: &str) {
        let Some(state) = self.model.form.as_mut() else {
            tracing::debug!("field edit ignored: no form bound");
            return;
        };
        if !state.snapshot.set_field(name, value) {
            state.snapshot.fields.push(FormField::new(name, value));
        }
        if let Some(transition) = self.tracker.record(name, value) {
            if let Some(cmd) = update::dirty_changed(&mut self.model, transition) {
                self.exec(cmd);
            }
        }
    }

    /// Submit the bound form in the background
    pub fn submit(&mut self) {
        if let Some(cmd) = update::submit(&mut self.model) {
            self.exec(cmd);
        }
    }

    /// Close the panel. Without `force`, a dirty form diverts to the
    /// confirmation flow; a duplicate close is a silent no-op.
    pub fn close(&mut self, force: bool) {
        if let Some(cmd) = update::close(&mut self.model, force) {
            self.exec(cmd);
        }
        if !self.model.active {
            self.tracker.reset();
        }
    }

    /// Escape closes the panel while it is open. Returns true when the key
    /// was consumed and the host should suppress further handling.
    pub fn handle_escape(&mut self) -> bool {
        if !self.model.escape_bound {
            return false;
        }
        self.close(false);
        true
    }

    /// Drain and apply pending asynchronous completions. Call from the
    /// host's event loop tick.
    pub fn pump(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: PanelMsg) {
        let cmd = match msg {
            // Resolved here rather than in `update`: binding the fetched
            // content needs the form bridge
            PanelMsg::LoadFinished { epoch, result } => {
                if epoch != self.model.epoch {
                    tracing::debug!("dropping stale content response");
                    return;
                }
                match result {
                    Ok(payload) => {
                        self.reveal(payload.title, payload.html);
                        return;
                    }
                    Err(error) => {
                        tracing::warn!(%error, "content load failed");
                        update::failed(&mut self.model, None)
                    }
                }
            }
            other => update::apply(&mut self.model, other),
        };
        if let Some(cmd) = cmd {
            self.exec(cmd);
        }
    }

    /// Execute a command, potentially spawning async operations
    fn exec(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.exec(cmd);
                }
            }

            Cmd::StartLoad { request, epoch } => {
                let tx = self.msg_tx.clone();
                let handle = self.loader.fetch(
                    request,
                    Box::new(move |result| {
                        let _ = tx.send(PanelMsg::LoadFinished { epoch, result });
                    }),
                );
                self.model.pending = Some(handle);
            }

            Cmd::ArmTimer { kind, epoch } => {
                let (delay, msg) = match kind {
                    TimerKind::TransitionKickoff => (
                        self.timing.transition_kickoff,
                        PanelMsg::TransitionTick { epoch },
                    ),
                    TimerKind::Watchdog => {
                        (self.timing.watchdog, PanelMsg::WatchdogFired { epoch })
                    }
                    TimerKind::CloseFinish => (
                        self.timing.close_animation,
                        PanelMsg::CloseFinished { epoch },
                    ),
                    TimerKind::ReloadDelay => (self.timing.reload_delay, PanelMsg::ReloadDue),
                };
                let handle = timer::spawn(delay, self.msg_tx.clone(), msg);
                let slot = match kind {
                    TimerKind::TransitionKickoff => &mut self.model.kickoff,
                    TimerKind::Watchdog => &mut self.model.watchdog,
                    TimerKind::CloseFinish => &mut self.model.close_timer,
                    TimerKind::ReloadDelay => &mut self.model.reload_timer,
                };
                if let Some(superseded) = slot.replace(handle) {
                    superseded.cancel();
                }
            }

            Cmd::SubmitForm { form } => {
                let tx = self.msg_tx.clone();
                let submitted = form.clone();
                self.bridge.submit(
                    form,
                    Box::new(move |outcome| {
                        let _ = tx.send(PanelMsg::SubmitFinished {
                            form: submitted,
                            outcome,
                        });
                    }),
                );
            }

            Cmd::Notify {
                text,
                style,
                sticky,
            } => {
                let message = match text {
                    NoticeText::Literal(message) => message,
                    NoticeText::Key(key) => self.translator.translate(key),
                };
                self.notifier.notify(Notice {
                    message,
                    style,
                    timeout: (!sticky).then_some(NOTICE_TIMEOUT),
                });
            }

            Cmd::AskConfirm { epoch } => {
                let tx = self.msg_tx.clone();
                let prompt = self.translator.translate(keys::CLOSE_CONFIRM);
                self.confirmer.confirm(
                    prompt,
                    Box::new(move |confirmed| {
                        let _ = tx.send(PanelMsg::ConfirmAnswered { epoch, confirmed });
                    }),
                );
            }

            Cmd::ApplyEnhancers { html } => {
                for enhancer in &self.enhancers {
                    if enhancer.wants(&html) {
                        tracing::debug!(enhancer = enhancer.name(), "applying content enhancer");
                        enhancer.apply(&html);
                    }
                }
            }

            Cmd::Emit(event) => {
                for observer in &self.observers {
                    observer(event, &self.model.shell);
                }
            }

            Cmd::ReloadPage => self.navigator.reload_page(),
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

/// Collaborator injection for [`Panel`]; every seam has a documented default
#[derive(Default)]
pub struct PanelBuilder {
    defaults: PanelDefaults,
    timing: Option<PanelTiming>,
    loader: Option<Box<dyn ContentLoader>>,
    bridge: Option<Box<dyn FormBridge>>,
    tracker: Option<Box<dyn DirtyTracker>>,
    notifier: Option<Box<dyn NotificationService>>,
    confirmer: Option<Box<dyn ConfirmationService>>,
    translator: Option<Box<dyn Translations>>,
    navigator: Option<Box<dyn Navigator>>,
    enhancers: Vec<Box<dyn Enhancer>>,
}

impl PanelBuilder {
    pub fn defaults(mut self, defaults: PanelDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn timing(mut self, timing: PanelTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn loader(mut self, loader: impl ContentLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn bridge(mut self, bridge: impl FormBridge + 'static) -> Self {
        self.bridge = Some(Box::new(bridge));
        self
    }

    pub fn tracker(mut self, tracker: impl DirtyTracker + 'static) -> Self {
        self.tracker = Some(Box::new(tracker));
        self
    }

    pub fn notifier(mut self, notifier: impl NotificationService + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn confirmer(mut self, confirmer: impl ConfirmationService + 'static) -> Self {
        self.confirmer = Some(Box::new(confirmer));
        self
    }

    pub fn translator(mut self, translator: impl Translations + 'static) -> Self {
        self.translator = Some(Box::new(translator));
        self
    }

    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    pub fn enhancer(mut self, enhancer: impl Enhancer + 'static) -> Self {
        self.enhancers.push(Box::new(enhancer));
        self
    }

    pub fn build(self) -> Panel {
        let (msg_tx, msg_rx) = mpsc::channel();
        Panel {
            model: PanelModel::new(),
            defaults: self.defaults,
            timing: self.timing.unwrap_or_default(),
            loader: self
                .loader
                .unwrap_or_else(|| Box::new(HttpContentLoader::new())),
            bridge: self
                .bridge
                .unwrap_or_else(|| Box::new(HttpFormBridge::new())),
            tracker: self
                .tracker
                .unwrap_or_else(|| Box::new(BaselineDirtyTracker::new())),
            notifier: self.notifier.unwrap_or_else(|| Box::new(LogNotifier)),
            confirmer: self.confirmer.unwrap_or_else(|| Box::new(AlwaysConfirm)),
            translator: self
                .translator
                .unwrap_or_else(|| Box::new(EnglishMessages)),
            navigator: self.navigator.unwrap_or_else(|| Box::new(NoopNavigator)),
            enhancers: self.enhancers,
            observers: Vec::new(),
            msg_tx,
            msg_rx,
        }
    }
}
