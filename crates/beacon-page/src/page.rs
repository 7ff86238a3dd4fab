#![forbid(unsafe_code)]

//! The page: controllers, host default actions, and the clock.
//!
//! A host (browser glue, test, or headless driver) feeds [`Event`]s into
//! [`Page::dispatch`]. The page routes each event to every attached
//! controller and then performs the default action a browser would, unless
//! a controller prevented it:
//!
//! | Event | Default action |
//! |-------|----------------|
//! | Tab / Shift+Tab | move focus along the document tab order |
//! | Enter on a button or link | activate it (synthesized click) |
//! | Space on a button | activate it |
//! | Enter in a single-line input inside a form | submit that form |
//! | Click | focus the nearest focusable element first, then submit if it is a submit button |
//! | Input | the value is updated before controllers see the event |
//!
//! Whenever focus leaves an element, that element receives a blur event.
//!
//! # Invariants
//!
//! 1. Events aimed at inert content are dropped before any controller sees
//!    them.
//! 2. Delayed controller work runs only when the clock moves or after a
//!    dispatch, never ahead of its deadline.

use std::time::Duration;

use beacon_core::focus::{is_focusable, is_inert, next_in_sequence};
use beacon_core::{Document, DocumentSnapshot, Event, EventResult, KeyCode, KeyEvent, NodeId};
use beacon_widgets::{Controller, DialogController, FormValidator, TableSorter, WireError};
use serde::Serialize;
use web_time::Instant;

use crate::config::PageConfig;
use crate::markup;

/// The running demo page.
#[derive(Debug)]
pub struct Page {
    doc: Document,
    dialog: Option<DialogController>,
    form: Option<FormValidator>,
    table: Option<TableSorter>,
    clock: Duration,
    epoch: Option<Instant>,
}

impl Page {
    /// Build the demo markup and attach every controller.
    #[must_use]
    pub fn new(config: PageConfig) -> Self {
        let doc = markup::build(&config);
        Self::from_document(doc, config)
    }

    /// Attach controllers to existing markup. A controller whose elements
    /// are missing stays detached; the rest of the page works normally.
    #[must_use]
    pub fn from_document(mut doc: Document, config: PageConfig) -> Self {
        let messages = config.messages().clone();
        let dialog = attached(
            "dialog",
            DialogController::attach(&mut doc, &config.dialog_ids, config.dialog),
        );
        let form = attached(
            "form",
            FormValidator::attach(
                &mut doc,
                &config.form_ids,
                config.rules,
                config.announcer,
                messages.clone(),
            ),
        );
        let table = attached(
            "table",
            TableSorter::attach(&mut doc, &config.table_ids, config.announcer, messages),
        );
        Self {
            doc,
            dialog,
            form,
            table,
            clock: Duration::ZERO,
            epoch: None,
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Direct document access for hosts that mutate markup.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub fn dialog(&self) -> Option<&DialogController> {
        self.dialog.as_ref()
    }

    #[must_use]
    pub fn form(&self) -> Option<&FormValidator> {
        self.form.as_ref()
    }

    #[must_use]
    pub fn table(&self) -> Option<&TableSorter> {
        self.table.as_ref()
    }

    /// Time since the page started.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Element id lookup, for hosts addressing elements by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<NodeId> {
        self.doc.get_element_by_id(id)
    }

    // --- Dispatch ---

    /// Deliver one host event.
    pub fn dispatch(&mut self, event: Event) -> EventResult {
        let _span = tracing::debug_span!("dispatch", ?event).entered();
        let result = match &event {
            Event::Key(key) => self.dispatch_key(key),
            Event::Click(target) => self.dispatch_click(*target),
            Event::Input { target, value } => {
                if is_inert(&self.doc, *target) {
                    return EventResult::Ignored;
                }
                self.doc.set_value(*target, value.as_str());
                self.route(&event)
            }
            Event::Blur(_) | Event::Submit(_) => self.route(&event),
        };
        self.run_due();
        result
    }

    /// Move focus as a host would, blurring the previous element.
    pub fn focus(&mut self, node: NodeId) -> bool {
        let moved = self.move_focus(node);
        self.run_due();
        moved
    }

    fn dispatch_key(&mut self, key: &KeyEvent) -> EventResult {
        let result = self.route(&Event::Key(*key));
        if result.is_default_prevented() || !key.is_press() {
            return result;
        }
        if let Some(direction) = key.navigation() {
            let from = self.doc.active_element();
            if let Some(next) = next_in_sequence(&self.doc, from, direction) {
                self.move_focus(next);
            }
            return result;
        }
        let Some(focused) = self.doc.focused() else {
            return result;
        };
        match key.code {
            KeyCode::Enter if activates_on_enter(&self.doc, focused) => {
                result.merge(self.dispatch_click(focused))
            }
            KeyCode::Enter => match implicit_submit_form(&self.doc, focused) {
                Some(form) => result.merge(self.route(&Event::Submit(form))),
                None => result,
            },
            KeyCode::Char(' ') if self.doc.tag(focused) == "button" => {
                result.merge(self.dispatch_click(focused))
            }
            _ => result,
        }
    }

    fn dispatch_click(&mut self, target: NodeId) -> EventResult {
        if is_inert(&self.doc, target) {
            return EventResult::Ignored;
        }
        let focus_target = std::iter::once(target)
            .chain(self.doc.ancestors(target))
            .find(|&n| is_focusable(&self.doc, n));
        if let Some(node) = focus_target {
            self.move_focus(node);
        }
        let result = self.route(&Event::Click(target));
        if result.is_default_prevented() {
            return result;
        }
        match submitting_form(&self.doc, target) {
            Some(form) => result.merge(self.route(&Event::Submit(form))),
            None => result,
        }
    }

    /// Run every attached controller, then blur whatever lost focus.
    fn route(&mut self, event: &Event) -> EventResult {
        let before = self.doc.focused();
        let Self {
            doc,
            dialog,
            form,
            table,
            clock,
            ..
        } = self;
        let controllers: [Option<&mut dyn Controller>; 3] = [
            dialog.as_mut().map(|c| c as &mut dyn Controller),
            form.as_mut().map(|c| c as &mut dyn Controller),
            table.as_mut().map(|c| c as &mut dyn Controller),
        ];
        let mut result = EventResult::Ignored;
        for controller in controllers.into_iter().flatten() {
            let outcome = controller.handle_event(doc, event, *clock);
            if outcome.is_handled() {
                tracing::trace!(controller = controller.name(), ?outcome, "event handled");
            }
            result = result.merge(outcome);
        }
        self.blur_if_moved(before);
        result
    }

    fn move_focus(&mut self, node: NodeId) -> bool {
        let before = self.doc.focused();
        let moved = self.doc.focus(node);
        if moved {
            self.blur_if_moved(before);
        }
        moved
    }

    fn blur_if_moved(&mut self, before: Option<NodeId>) {
        if let Some(previous) = before
            && self.doc.focused() != Some(previous)
        {
            self.route(&Event::Blur(previous));
        }
    }

    // --- Clock ---

    /// Advance the page clock and run whatever came due.
    pub fn advance(&mut self, delta: Duration) {
        self.clock += delta;
        self.run_due();
    }

    /// Move the clock to wall time. The first call anchors the page start so
    /// that the current clock value is preserved; the clock never runs
    /// backwards.
    pub fn sync_clock(&mut self, now: Instant) {
        let clock = self.clock;
        let epoch = *self
            .epoch
            .get_or_insert_with(|| now.checked_sub(clock).unwrap_or(now));
        let elapsed = now.saturating_duration_since(epoch);
        if elapsed > self.clock {
            self.clock = elapsed;
        }
        self.run_due();
    }

    /// Earliest pending delayed work across controllers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.dialog.as_ref().and_then(Controller::next_deadline),
            self.form.as_ref().and_then(Controller::next_deadline),
            self.table.as_ref().and_then(Controller::next_deadline),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn run_due(&mut self) {
        let now = self.clock;
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.tick(&mut self.doc, now);
        }
        if let Some(form) = self.form.as_mut() {
            form.tick(&mut self.doc, now);
        }
        if let Some(table) = self.table.as_mut() {
            table.tick(&mut self.doc, now);
        }
    }

    // --- Snapshot ---

    /// Serializable view of the page state.
    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            clock_ms: u64::try_from(self.clock.as_millis()).unwrap_or(u64::MAX),
            dialog_open: self.dialog.as_ref().map(DialogController::is_open),
            sort: self.table.as_ref().and_then(|t| {
                let state = t.state();
                state.column().map(|column| SortSnapshot {
                    column,
                    direction: state.direction().aria_value(),
                })
            }),
            document: self.doc.snapshot(),
        }
    }
}

fn attached<C>(name: &'static str, result: Result<C, WireError>) -> Option<C> {
    match result {
        Ok(controller) => Some(controller),
        Err(err) => {
            tracing::debug!(controller = name, error = %err, "controller not attached");
            None
        }
    }
}

/// Buttons and links activate on Enter.
fn activates_on_enter(doc: &Document, node: NodeId) -> bool {
    match doc.tag(node) {
        "button" => true,
        "a" => doc.has_attr(node, "href"),
        _ => false,
    }
}

/// The form a press of Enter in `node` submits, if any.
fn implicit_submit_form(doc: &Document, node: NodeId) -> Option<NodeId> {
    if doc.tag(node) != "input" {
        return None;
    }
    let kind = doc.attr(node, "type").unwrap_or("text");
    if matches!(kind, "button" | "checkbox" | "radio" | "reset" | "hidden") {
        return None;
    }
    enclosing_form(doc, node)
}

/// The form submitted by clicking `target`, if it is (inside) a submit button.
fn submitting_form(doc: &Document, target: NodeId) -> Option<NodeId> {
    let button = std::iter::once(target)
        .chain(doc.ancestors(target))
        .find(|&n| match doc.tag(n) {
            "button" => doc.attr(n, "type").is_none_or(|t| t == "submit"),
            "input" => doc.attr_is(n, "type", "submit"),
            _ => false,
        })?;
    if doc.has_attr(button, "disabled") {
        return None;
    }
    enclosing_form(doc, button)
}

fn enclosing_form(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.ancestors(node).find(|&a| doc.tag(a) == "form")
}

/// Page state for logs and test artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub clock_ms: u64,
    pub dialog_open: Option<bool>,
    pub sort: Option<SortSnapshot>,
    pub document: DocumentSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSnapshot {
    pub column: usize,
    pub direction: &'static str,
}

impl PageSnapshot {
    /// Single-line JSON, suitable for JSONL logs.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::Modifiers;

    fn page() -> Page {
        Page::new(PageConfig::default())
    }

    fn id(page: &Page, id: &str) -> NodeId {
        page.element(id).unwrap()
    }

    #[test]
    fn all_controllers_attach_on_demo_markup() {
        let p = page();
        assert!(p.dialog().is_some());
        assert!(p.form().is_some());
        assert!(p.table().is_some());
    }

    #[test]
    fn missing_markup_leaves_controller_detached() {
        let mut doc = markup::build(&PageConfig::default());
        let status = doc.get_element_by_id("form-status").unwrap();
        doc.remove_attr(status, "id");
        let mut p = Page::from_document(doc, PageConfig::default());
        assert!(p.form().is_none());
        assert!(p.dialog().is_some());
        let trigger = id(&p, "sort-button-0");
        assert_eq!(p.dispatch(Event::Click(trigger)), EventResult::Consumed);
    }

    #[test]
    fn tab_default_walks_document_order() {
        let mut p = page();
        p.dispatch(Event::Key(KeyEvent::new(KeyCode::Tab)));
        let skip = p.document().focused().unwrap();
        assert_eq!(p.document().attr(skip, "href"), Some("#main-content"));
        p.dispatch(Event::Key(
            KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT),
        ));
        let last = p.document().focused().unwrap();
        assert_eq!(p.document().id_of(last), Some("sort-button-2"));
    }

    #[test]
    fn enter_on_trigger_opens_dialog() {
        let mut p = page();
        let trigger = id(&p, "open-dialog");
        assert!(p.focus(trigger));
        p.dispatch(Event::Key(KeyEvent::new(KeyCode::Enter)));
        assert!(p.dialog().unwrap().is_open());
        assert_eq!(p.document().focused(), p.element("dialog-email"));
    }

    #[test]
    fn click_on_inert_background_is_dropped() {
        let mut p = page();
        let trigger = id(&p, "open-dialog");
        p.dispatch(Event::Click(trigger));
        let sort = id(&p, "sort-button-0");
        assert_eq!(p.dispatch(Event::Click(sort)), EventResult::Ignored);
        assert_eq!(p.table().unwrap().state().column(), None);
    }

    #[test]
    fn input_sets_value_without_validating() {
        let mut p = page();
        let email = id(&p, "email");
        p.dispatch(Event::Input {
            target: email,
            value: "not-an-email".into(),
        });
        assert_eq!(p.document().value(email), "not-an-email");
        assert!(!p.document().has_attr(email, "aria-invalid"));
    }

    #[test]
    fn focus_change_blurs_previous_field() {
        let mut p = page();
        let email = id(&p, "email");
        p.focus(email);
        p.dispatch(Event::Input {
            target: email,
            value: "x@".into(),
        });
        let message = id(&p, "message");
        p.focus(message);
        assert!(p.document().attr_is(email, "aria-invalid", "true"));
    }

    #[test]
    fn enter_in_input_submits_form() {
        let mut p = page();
        let name = id(&p, "name");
        p.focus(name);
        let r = p.dispatch(Event::Key(KeyEvent::new(KeyCode::Enter)));
        assert!(r.is_default_prevented());
        assert_eq!(p.document().focused(), Some(name));
        let status = id(&p, "form-status");
        assert_eq!(p.next_deadline(), Some(Duration::from_millis(100)));
        p.advance(Duration::from_millis(100));
        assert!(!p.document().text_content(status).is_empty());
    }

    #[test]
    fn second_failed_submit_is_announced_again() {
        let mut p = page();
        let name = id(&p, "name");
        let status = id(&p, "form-status");
        p.focus(name);
        p.dispatch(Event::Key(KeyEvent::new(KeyCode::Enter)));
        p.advance(Duration::from_millis(100));
        let first = p.document().text_content(status);
        assert!(!first.is_empty());

        p.dispatch(Event::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(p.document().text_content(status), "");
        p.advance(Duration::from_millis(100));
        assert_eq!(p.document().text_content(status), first);
    }

    #[test]
    fn announcement_waits_for_clock() {
        let mut p = page();
        let sort = id(&p, "sort-button-1");
        let region = id(&p, "sort-status");
        p.dispatch(Event::Click(sort));
        assert_eq!(p.document().text_content(region), "");
        assert_eq!(p.next_deadline(), Some(Duration::from_millis(100)));
        p.advance(Duration::from_millis(99));
        assert_eq!(p.document().text_content(region), "");
        p.advance(Duration::from_millis(1));
        assert_eq!(
            p.document().text_content(region),
            "Table sorted by First released, ascending."
        );
        assert_eq!(p.next_deadline(), None);
    }

    #[test]
    fn sync_clock_never_runs_backwards() {
        let mut p = page();
        p.advance(Duration::from_millis(500));
        let start = Instant::now();
        p.sync_clock(start);
        assert_eq!(p.now(), Duration::from_millis(500));
        p.sync_clock(start + Duration::from_millis(250));
        assert_eq!(p.now(), Duration::from_millis(750));
        p.sync_clock(start);
        assert_eq!(p.now(), Duration::from_millis(750));
    }

    #[test]
    fn snapshot_serializes() {
        let mut p = page();
        let sort = id(&p, "sort-button-2");
        p.dispatch(Event::Click(sort));
        let snap = p.snapshot();
        assert_eq!(
            snap.sort,
            Some(SortSnapshot {
                column: 2,
                direction: "ascending"
            })
        );
        assert_eq!(snap.dialog_open, Some(false));
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"sort-header-2\""));
        assert!(!json.contains('\n'));
    }
}
