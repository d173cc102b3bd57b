//! Dirty-form close guard tests
//!
//! Covers submit-trigger toggling, the confirmation flow, and the force
//! bypass.

mod common;

use std::time::Duration;

use common::{harness, payload, pump_until, EDIT_FORM_HTML};
use quickpanel::markup::Trigger;
use quickpanel::{OpenOptions, Source};

fn open_with_form(h: &mut common::Harness) {
    h.panel.open(
        Source::Element(Trigger::new().with_href("/items/5/edit")),
        OpenOptions::default(),
    );
    h.loader.resolve(Ok(payload("Edit Item", EDIT_FORM_HTML)));
    h.panel.pump();
}

#[test]
fn edits_toggle_the_submit_trigger() {
    let mut h = harness();
    open_with_form(&mut h);

    let form = h.panel.model().form.as_ref().unwrap();
    assert!(!form.submit_enabled);

    h.panel.field_edited("title", "Gadget");
    let form = h.panel.model().form.as_ref().unwrap();
    assert!(form.dirty);
    assert!(form.submit_enabled);
    assert_eq!(form.snapshot.field("title"), Some("Gadget"));

    // Reverting the edit goes clean again
    h.panel.field_edited("title", "Widget");
    let form = h.panel.model().form.as_ref().unwrap();
    assert!(!form.dirty);
    assert!(!form.submit_enabled);
}

#[test]
fn dirty_close_diverts_to_confirmation() {
    let mut h = harness();
    h.confirm.set_answer(None); // question stays unanswered
    open_with_form(&mut h);

    h.panel.field_edited("title", "Gadget");
    h.panel.close(false);
    h.panel.pump();

    assert!(h.panel.model().active);
    assert_eq!(
        h.confirm.prompts(),
        vec!["Are you sure you want to close this?".to_string()]
    );
}

#[test]
fn declined_confirmation_keeps_the_panel_open() {
    let mut h = harness();
    h.confirm.set_answer(Some(false));
    open_with_form(&mut h);

    h.panel.field_edited("title", "Gadget");
    h.panel.close(false);
    h.panel.pump();

    let model = h.panel.model();
    assert!(model.active);
    assert!(model.is_dirty());
    assert_eq!(h.confirm.prompts().len(), 1);
}

#[test]
fn accepted_confirmation_closes() {
    let mut h = harness();
    h.confirm.set_answer(Some(true));
    open_with_form(&mut h);

    h.panel.field_edited("title", "Gadget");
    h.panel.close(false);
    h.panel.pump();

    assert!(!h.panel.model().active);
}

#[test]
fn force_close_bypasses_the_guard() {
    let mut h = harness();
    h.confirm.set_answer(None);
    open_with_form(&mut h);

    h.panel.field_edited("title", "Gadget");
    h.panel.close(true);

    assert!(!h.panel.model().active);
    assert!(h.confirm.prompts().is_empty());
}

#[test]
fn clean_close_skips_confirmation() {
    let mut h = harness();
    h.confirm.set_answer(None);
    open_with_form(&mut h);

    h.panel.close(false);
    assert!(!h.panel.model().active);
    assert!(h.confirm.prompts().is_empty());
}

#[test]
fn escape_on_a_dirty_form_still_asks() {
    let mut h = harness();
    h.confirm.set_answer(None);
    open_with_form(&mut h);

    h.panel.field_edited("notes", "edited");
    assert!(h.panel.handle_escape());
    h.panel.pump();

    assert!(h.panel.model().active);
    assert_eq!(h.confirm.prompts().len(), 1);
}

#[test]
fn stale_confirmation_answer_cannot_close_a_new_cycle() {
    let mut h = harness();
    h.confirm.set_answer(None);
    open_with_form(&mut h);

    h.panel.field_edited("title", "Gadget");
    h.panel.close(false); // question shown, left unanswered
    h.panel.close(true); // user force-closes instead
    assert!(pump_until(&mut h.panel, Duration::from_secs(1), |p| !p
        .model()
        .closing));

    // A new cycle begins; the old cycle's answer arriving now is stale
    open_with_form(&mut h);
    h.confirm.deliver(true);
    h.panel.pump();
    assert!(h.panel.model().active);
}
