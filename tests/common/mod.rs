//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use quickpanel::bridge::{scan_form, FormBridge, SubmitCallback, SubmitOutcome};
use quickpanel::loader::{ContentLoader, ContentPayload, ContentRequest, LoadCallback, LoadHandle};
use quickpanel::messages::PanelEvent;
use quickpanel::model::FormSnapshot;
use quickpanel::notify::{ConfirmationService, Navigator, Notice, NotificationService};
use quickpanel::{Panel, PanelTiming};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();
}

/// Loader under test control: requests are recorded, responses delivered on
/// demand
#[derive(Clone, Default)]
pub struct ManualLoader {
    inner: Rc<RefCell<LoaderInner>>,
}

#[derive(Default)]
struct LoaderInner {
    requests: Vec<ContentRequest>,
    pending: Option<(LoadCallback, LoadHandle)>,
}

impl ManualLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }

    pub fn last_request(&self) -> Option<ContentRequest> {
        self.inner.borrow().requests.last().cloned()
    }

    pub fn last_aborted(&self) -> bool {
        self.inner
            .borrow()
            .pending
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_aborted())
    }

    /// Deliver the response, honoring the abort contract like a real loader
    pub fn resolve(&self, result: Result<ContentPayload, String>) {
        let (done, handle) = self
            .inner
            .borrow_mut()
            .pending
            .take()
            .expect("no request in flight");
        if !handle.is_aborted() {
            done(result);
        }
    }

    /// Deliver the response even after an abort, modeling a sloppy transport;
    /// the panel's stale checks must still drop it
    pub fn force_resolve(&self, result: Result<ContentPayload, String>) {
        let (done, _) = self
            .inner
            .borrow_mut()
            .pending
            .take()
            .expect("no request in flight");
        done(result);
    }
}

impl ContentLoader for ManualLoader {
    fn fetch(&self, request: ContentRequest, done: LoadCallback) -> LoadHandle {
        let handle = LoadHandle::new();
        let mut inner = self.inner.borrow_mut();
        inner.requests.push(request);
        inner.pending = Some((done, handle.clone()));
        handle
    }
}

/// Bridge under test control: extraction uses the real scanner, submissions
/// are recorded and resolved on demand
#[derive(Clone, Default)]
pub struct ManualBridge {
    inner: Rc<RefCell<BridgeInner>>,
}

#[derive(Default)]
struct BridgeInner {
    submissions: Vec<FormSnapshot>,
    pending: Option<SubmitCallback>,
}

impl ManualBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submission_count(&self) -> usize {
        self.inner.borrow().submissions.len()
    }

    pub fn last_submission(&self) -> Option<FormSnapshot> {
        self.inner.borrow().submissions.last().cloned()
    }

    pub fn resolve(&self, outcome: SubmitOutcome) {
        let done = self
            .inner
            .borrow_mut()
            .pending
            .take()
            .expect("no submission in flight");
        done(outcome);
    }
}

impl FormBridge for ManualBridge {
    fn extract(&self, html: &str) -> Option<FormSnapshot> {
        scan_form(html)
    }

    fn submit(&self, form: FormSnapshot, done: SubmitCallback) {
        let mut inner = self.inner.borrow_mut();
        inner.submissions.push(form);
        inner.pending = Some(done);
    }
}

/// Records every surfaced notice
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl NotificationService for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

/// Confirmation dialog with a scripted answer; `None` leaves the question
/// unanswered
#[derive(Clone, Default)]
pub struct ScriptedConfirm {
    inner: Rc<RefCell<ConfirmInner>>,
}

#[derive(Default)]
struct ConfirmInner {
    answer: Option<bool>,
    prompts: Vec<String>,
    pending: Option<Box<dyn FnOnce(bool) + Send>>,
}

impl ScriptedConfirm {
    pub fn set_answer(&self, answer: Option<bool>) {
        self.inner.borrow_mut().answer = answer;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.inner.borrow().prompts.clone()
    }

    /// Answer a question left pending by `set_answer(None)`
    pub fn deliver(&self, choice: bool) {
        let pending = self
            .inner
            .borrow_mut()
            .pending
            .take()
            .expect("no pending question");
        pending(choice);
    }
}

impl ConfirmationService for ScriptedConfirm {
    fn confirm(&self, prompt: String, answer: Box<dyn FnOnce(bool) + Send>) {
        let mut inner = self.inner.borrow_mut();
        inner.prompts.push(prompt);
        match inner.answer {
            Some(choice) => {
                drop(inner);
                answer(choice);
            }
            None => inner.pending = Some(answer),
        }
    }
}

/// Counts requested page reloads
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    reloads: Rc<RefCell<usize>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reloads(&self) -> usize {
        *self.reloads.borrow()
    }
}

impl Navigator for RecordingNavigator {
    fn reload_page(&self) {
        *self.reloads.borrow_mut() += 1;
    }
}

/// A panel wired to controllable collaborators
pub struct Harness {
    pub panel: Panel,
    pub loader: ManualLoader,
    pub bridge: ManualBridge,
    pub notices: RecordingNotifier,
    pub confirm: ScriptedConfirm,
    pub navigator: RecordingNavigator,
    pub events: Rc<RefCell<Vec<PanelEvent>>>,
}

impl Harness {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.notices()
    }

    pub fn events(&self) -> Vec<PanelEvent> {
        self.events.borrow().clone()
    }
}

/// Timing safe for tests that never want the watchdog or teardown racing them
pub fn calm_timing() -> PanelTiming {
    PanelTiming {
        transition_kickoff: Duration::from_millis(1),
        watchdog: Duration::from_secs(5),
        close_animation: Duration::from_millis(15),
        reload_delay: Duration::from_millis(15),
    }
}

/// Timing for watchdog tests
pub fn strict_timing() -> PanelTiming {
    PanelTiming {
        transition_kickoff: Duration::from_millis(1),
        watchdog: Duration::from_millis(60),
        close_animation: Duration::from_millis(15),
        reload_delay: Duration::from_millis(15),
    }
}

pub fn harness() -> Harness {
    harness_with_timing(calm_timing())
}

pub fn harness_with_timing(timing: PanelTiming) -> Harness {
    init_tracing();

    let loader = ManualLoader::new();
    let bridge = ManualBridge::new();
    let notices = RecordingNotifier::new();
    let confirm = ScriptedConfirm::default();
    let navigator = RecordingNavigator::new();
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut panel = Panel::builder()
        .timing(timing)
        .loader(loader.clone())
        .bridge(bridge.clone())
        .notifier(notices.clone())
        .confirmer(confirm.clone())
        .navigator(navigator.clone())
        .build();

    let seen = Rc::clone(&events);
    panel.observe(move |event, _shell| seen.borrow_mut().push(event));

    Harness {
        panel,
        loader,
        bridge,
        notices,
        confirm,
        navigator,
        events,
    }
}

/// Pump the panel until the predicate holds or the deadline passes
pub fn pump_until(panel: &mut Panel, deadline: Duration, pred: impl Fn(&Panel) -> bool) -> bool {
    let start = Instant::now();
    loop {
        panel.pump();
        if pred(panel) {
            return true;
        }
        if start.elapsed() > deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(2));
    }
}

/// Pump for a fixed duration, asserting nothing
pub fn settle(panel: &mut Panel, duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        panel.pump();
        thread::sleep(Duration::from_millis(2));
    }
    panel.pump();
}

pub fn payload(title: &str, html: &str) -> ContentPayload {
    ContentPayload {
        title: title.to_string(),
        html: html.to_string(),
    }
}

pub const EDIT_FORM_HTML: &str = r#"<form action="/items/5" method="post">
    <input type="hidden" name="_method" value="PUT">
    <input name="title" value="Widget">
    <textarea name="notes">original</textarea>
</form>"#;

pub const CREATE_FORM_HTML: &str = r#"<form action="/items" method="post">
    <input name="title" value="">
</form>"#;
