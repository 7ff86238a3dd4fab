#![forbid(unsafe_code)]

use std::time::Duration;

use beacon_core::focus::focus_cycle;
use beacon_core::{Document, Event, EventResult, KeyCode, KeyEvent, NodeId};

use super::trap::{TrapStep, resolve_tab};
use crate::{Controller, WireError, require, require_all};

const NAME: &str = "dialog";

/// Element ids the dialog controller binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogIds {
    /// Backdrop covering the page; also the show/hide target.
    pub overlay: String,
    /// The `role="dialog"` panel holding the content.
    pub panel: String,
    /// Controls that open the dialog.
    pub open_triggers: Vec<String>,
    /// Controls inside the panel that close it.
    pub close_controls: Vec<String>,
    /// Background regions made inert while open.
    pub landmarks: Vec<String>,
}

impl Default for DialogIds {
    fn default() -> Self {
        Self {
            overlay: "dialog-overlay".into(),
            panel: "dialog".into(),
            open_triggers: vec!["open-dialog".into()],
            close_controls: vec!["dialog-confirm".into(), "close-dialog".into()],
            landmarks: vec![
                "site-header".into(),
                "main-content".into(),
                "site-footer".into(),
            ],
        }
    }
}

/// Dialog behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogConfig {
    pub close_on_escape: bool,
    pub close_on_backdrop: bool,
    pub restore_focus: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            close_on_backdrop: true,
            restore_focus: true,
        }
    }
}

impl DialogConfig {
    /// Set whether Escape closes the dialog.
    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    /// Set whether a click on the backdrop itself closes the dialog.
    #[must_use]
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    /// Set whether focus returns to the trigger on close.
    #[must_use]
    pub fn restore_focus(mut self, restore: bool) -> Self {
        self.restore_focus = restore;
        self
    }
}

/// Why the dialog closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    CloseControl,
    Backdrop,
    Programmatic,
}

/// Open/closed state plus the focus bookkeeping that goes with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogState {
    open: bool,
    trigger: Option<NodeId>,
    trap: bool,
}

impl DialogState {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Element focus returns to on close.
    #[must_use]
    pub fn trigger(&self) -> Option<NodeId> {
        self.trigger
    }

    #[must_use]
    pub fn trap_active(&self) -> bool {
        self.trap
    }
}

/// Modal dialog controller.
#[derive(Debug, Clone)]
pub struct DialogController {
    overlay: NodeId,
    panel: NodeId,
    open_triggers: Vec<NodeId>,
    close_controls: Vec<NodeId>,
    landmarks: Vec<NodeId>,
    config: DialogConfig,
    state: DialogState,
    trap_installs: u64,
}

impl DialogController {
    /// Bind to the dialog markup and normalize it to the closed state.
    pub fn attach(
        doc: &mut Document,
        ids: &DialogIds,
        config: DialogConfig,
    ) -> Result<Self, WireError> {
        let overlay = require(doc, NAME, &ids.overlay)?;
        let panel = require(doc, NAME, &ids.panel)?;
        let open_triggers = require_all(doc, NAME, &ids.open_triggers)?;
        let close_controls = require_all(doc, NAME, &ids.close_controls)?;
        let landmarks = require_all(doc, NAME, &ids.landmarks)?;
        // The panel is the focus target of last resort, so it must be focusable.
        if !doc.has_attr(panel, "tabindex") {
            doc.set_attr(panel, "tabindex", "-1");
        }

        let controller = Self {
            overlay,
            panel,
            open_triggers,
            close_controls,
            landmarks,
            config,
            state: DialogState::default(),
            trap_installs: 0,
        };
        controller.render_closed(doc);
        Ok(controller)
    }

    #[must_use]
    pub fn config(&self) -> DialogConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> &DialogState {
        &self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.open
    }

    #[must_use]
    pub fn trigger(&self) -> Option<NodeId> {
        self.state.trigger
    }

    #[must_use]
    pub fn trap_active(&self) -> bool {
        self.state.trap
    }

    /// How many times the trap has been installed.
    #[must_use]
    pub fn trap_installs(&self) -> u64 {
        self.trap_installs
    }

    #[must_use]
    pub fn panel(&self) -> NodeId {
        self.panel
    }

    #[must_use]
    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    /// Operable elements inside the panel, in document order.
    #[must_use]
    pub fn focus_cycle(&self, doc: &Document) -> Vec<NodeId> {
        focus_cycle(doc, self.panel)
    }

    /// Open the dialog, remembering `trigger` for focus restore.
    ///
    /// Returns `false` when already open.
    pub fn open(&mut self, doc: &mut Document, trigger: NodeId) -> bool {
        if self.state.open {
            return false;
        }
        self.state.open = true;
        self.state.trigger = Some(trigger);

        doc.remove_attr(self.overlay, "hidden");
        doc.set_attr(self.overlay, "aria-hidden", "false");
        for &landmark in &self.landmarks {
            doc.toggle_attr(landmark, "inert", true);
        }

        let landed = match self.focus_cycle(doc).first() {
            Some(&first) => doc.focus(first),
            None => false,
        };
        if !landed {
            doc.focus(self.panel);
        }

        self.state.trap = true;
        self.trap_installs += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            trigger = ?doc.id_of(trigger),
            focused = ?doc.focused().and_then(|f| doc.id_of(f)),
            "dialog opened"
        );
        true
    }

    /// Close the dialog and restore focus.
    ///
    /// Returns `false` when already closed.
    pub fn close(&mut self, doc: &mut Document, reason: CloseReason) -> bool {
        if !self.state.open {
            return false;
        }
        self.state.open = false;
        self.state.trap = false;
        self.render_closed(doc);

        let trigger = self.state.trigger.take();
        if self.config.restore_focus {
            let restored = trigger.is_some_and(|t| doc.focus(t));
            if !restored {
                doc.blur();
            }
        } else if doc.focused().is_some_and(|f| doc.contains(self.overlay, f)) {
            doc.blur();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            ?reason,
            restored = ?doc.focused().and_then(|f| doc.id_of(f)),
            "dialog closed"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = reason;
        true
    }

    fn render_closed(&self, doc: &mut Document) {
        doc.toggle_attr(self.overlay, "hidden", true);
        doc.set_attr(self.overlay, "aria-hidden", "true");
        for &landmark in &self.landmarks {
            doc.toggle_attr(landmark, "inert", false);
        }
    }

    /// Escape and Tab handling while the trap is installed.
    pub fn handle_key(&mut self, doc: &mut Document, key: &KeyEvent) -> EventResult {
        if !self.state.trap || !key.is_press() {
            return EventResult::Ignored;
        }
        if key.code == KeyCode::Escape {
            if self.config.close_on_escape {
                self.close(doc, CloseReason::Escape);
                return EventResult::PreventDefault;
            }
            return EventResult::Ignored;
        }
        let Some(direction) = key.navigation() else {
            return EventResult::Ignored;
        };
        let cycle = self.focus_cycle(doc);
        match resolve_tab(&cycle, doc.focused(), direction) {
            TrapStep::PassThrough => EventResult::Ignored,
            TrapStep::MoveTo(target) => {
                doc.focus(target);
                EventResult::PreventDefault
            }
            TrapStep::HoldContainer => {
                doc.focus(self.panel);
                EventResult::PreventDefault
            }
        }
    }

    /// Trigger, close-control and backdrop clicks.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> EventResult {
        if !self.state.open {
            let trigger = self
                .open_triggers
                .iter()
                .copied()
                .find(|&t| doc.contains(t, target));
            return match trigger {
                Some(trigger) => {
                    self.open(doc, trigger);
                    EventResult::Consumed
                }
                None => EventResult::Ignored,
            };
        }
        if self.close_controls.iter().any(|&c| doc.contains(c, target)) {
            self.close(doc, CloseReason::CloseControl);
            return EventResult::Consumed;
        }
        // Only the backdrop itself; clicks bubbling out of the panel do not count.
        if target == self.overlay && self.config.close_on_backdrop {
            self.close(doc, CloseReason::Backdrop);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }
}

impl Controller for DialogController {
    fn name(&self) -> &'static str {
        NAME
    }

    fn handle_event(&mut self, doc: &mut Document, event: &Event, _now: Duration) -> EventResult {
        match event {
            Event::Key(key) => self.handle_key(doc, key),
            Event::Click(target) => self.handle_click(doc, *target),
            _ => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{KeyEventKind, Modifiers};

    struct Fixture {
        doc: Document,
        dialog: DialogController,
        open_btn: NodeId,
        other_btn: NodeId,
        first: NodeId,
        middle: NodeId,
        close_btn: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let header = doc.element("header").id("site-header").append_to(body);
        doc.element("a").attr("href", "#main").text("Skip").append_to(header);
        let main = doc.element("main").id("main-content").append_to(body);
        let open_btn = doc
            .element("button")
            .id("open-dialog")
            .text("Open dialog")
            .append_to(main);
        let other_btn = doc.element("button").id("other").append_to(main);
        doc.element("footer").id("site-footer").append_to(body);

        let overlay = doc.element("div").id("dialog-overlay").append_to(body);
        let panel = doc
            .element("div")
            .id("dialog")
            .attr("role", "dialog")
            .attr("aria-modal", "true")
            .attr("tabindex", "-1")
            .append_to(overlay);
        doc.element("h2").text("Subscribe").append_to(panel);
        let first = doc
            .element("input")
            .id("dialog-email")
            .attr("type", "email")
            .append_to(panel);
        let middle = doc.element("button").id("dialog-confirm").append_to(panel);
        let close_btn = doc
            .element("button")
            .id("close-dialog")
            .attr("aria-label", "Close")
            .append_to(panel);

        let dialog =
            DialogController::attach(&mut doc, &DialogIds::default(), DialogConfig::default())
                .unwrap();
        Fixture {
            doc,
            dialog,
            open_btn,
            other_btn,
            first,
            middle,
            close_btn,
        }
    }

    fn tab() -> KeyEvent {
        KeyEvent::new(KeyCode::Tab)
    }

    fn shift_tab() -> KeyEvent {
        KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT)
    }

    #[test]
    fn attach_starts_closed_and_hidden() {
        let f = fixture();
        assert!(!f.dialog.is_open());
        assert!(!f.dialog.trap_active());
        assert!(f.doc.has_attr(f.dialog.overlay(), "hidden"));
        assert!(f.doc.attr_is(f.dialog.overlay(), "aria-hidden", "true"));
    }

    #[test]
    fn attach_fails_on_missing_markup() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.element("div").id("dialog-overlay").append_to(body);
        let err = DialogController::attach(&mut doc, &DialogIds::default(), DialogConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            WireError::MissingElement {
                controller: "dialog",
                id: "dialog".into()
            }
        );
    }

    #[test]
    fn open_focuses_first_and_inerts_background() {
        let mut f = fixture();
        f.doc.focus(f.open_btn);
        assert_eq!(
            f.dialog.handle_click(&mut f.doc, f.open_btn),
            EventResult::Consumed
        );
        assert!(f.dialog.is_open());
        assert!(f.dialog.trap_active());
        assert_eq!(f.dialog.trigger(), Some(f.open_btn));
        assert_eq!(f.doc.focused(), Some(f.first));
        assert!(!f.doc.has_attr(f.dialog.overlay(), "hidden"));
        assert!(f.doc.attr_is(f.dialog.overlay(), "aria-hidden", "false"));
        let main = f.doc.get_element_by_id("main-content").unwrap();
        assert!(f.doc.has_attr(main, "inert"));
        assert!(!f.doc.focus(f.other_btn), "background is inert");
    }

    #[test]
    fn tab_wraps_both_ways() {
        let mut f = fixture();
        f.dialog.open(&mut f.doc, f.open_btn);

        f.doc.focus(f.close_btn);
        assert_eq!(
            f.dialog.handle_key(&mut f.doc, &tab()),
            EventResult::PreventDefault
        );
        assert_eq!(f.doc.focused(), Some(f.first));

        assert_eq!(
            f.dialog.handle_key(&mut f.doc, &shift_tab()),
            EventResult::PreventDefault
        );
        assert_eq!(f.doc.focused(), Some(f.close_btn));

        f.doc.focus(f.middle);
        assert_eq!(f.dialog.handle_key(&mut f.doc, &tab()), EventResult::Ignored);
        assert_eq!(f.doc.focused(), Some(f.middle));
    }

    #[test]
    fn back_tab_code_counts_as_backward() {
        let mut f = fixture();
        f.dialog.open(&mut f.doc, f.open_btn);
        assert_eq!(
            f.dialog
                .handle_key(&mut f.doc, &KeyEvent::new(KeyCode::BackTab)),
            EventResult::PreventDefault
        );
        assert_eq!(f.doc.focused(), Some(f.close_btn));
    }

    #[test]
    fn cycle_tracks_content_changes() {
        let mut f = fixture();
        f.dialog.open(&mut f.doc, f.open_btn);
        f.doc.toggle_attr(f.close_btn, "disabled", true);
        f.doc.focus(f.middle);
        assert_eq!(
            f.dialog.handle_key(&mut f.doc, &tab()),
            EventResult::PreventDefault
        );
        assert_eq!(f.doc.focused(), Some(f.first));
    }

    #[test]
    fn escape_closes_and_restores_focus() {
        let mut f = fixture();
        f.doc.focus(f.open_btn);
        f.dialog.open(&mut f.doc, f.open_btn);
        assert_eq!(
            f.dialog
                .handle_key(&mut f.doc, &KeyEvent::new(KeyCode::Escape)),
            EventResult::PreventDefault
        );
        assert!(!f.dialog.is_open());
        assert!(!f.dialog.trap_active());
        assert_eq!(f.dialog.trigger(), None);
        assert_eq!(f.doc.focused(), Some(f.open_btn));
        let main = f.doc.get_element_by_id("main-content").unwrap();
        assert!(!f.doc.has_attr(main, "inert"));
        assert!(f.doc.has_attr(f.dialog.overlay(), "hidden"));
    }

    #[test]
    fn escape_ignored_when_disabled_by_config() {
        let mut f = fixture();
        f.dialog.config = DialogConfig::default().close_on_escape(false);
        f.dialog.open(&mut f.doc, f.open_btn);
        assert_eq!(
            f.dialog
                .handle_key(&mut f.doc, &KeyEvent::new(KeyCode::Escape)),
            EventResult::Ignored
        );
        assert!(f.dialog.is_open());
    }

    #[test]
    fn keys_ignored_when_closed_or_released() {
        let mut f = fixture();
        assert_eq!(f.dialog.handle_key(&mut f.doc, &tab()), EventResult::Ignored);
        f.dialog.open(&mut f.doc, f.open_btn);
        let release = KeyEvent::new(KeyCode::Escape).with_kind(KeyEventKind::Release);
        assert_eq!(
            f.dialog.handle_key(&mut f.doc, &release),
            EventResult::Ignored
        );
        assert!(f.dialog.is_open());
    }

    #[test]
    fn backdrop_click_only_on_overlay_itself() {
        let mut f = fixture();
        f.dialog.open(&mut f.doc, f.open_btn);
        let panel = f.dialog.panel();
        assert_eq!(f.dialog.handle_click(&mut f.doc, panel), EventResult::Ignored);
        assert!(f.dialog.is_open());
        let overlay = f.dialog.overlay();
        assert_eq!(
            f.dialog.handle_click(&mut f.doc, overlay),
            EventResult::Consumed
        );
        assert!(!f.dialog.is_open());
    }

    #[test]
    fn close_control_closes() {
        let mut f = fixture();
        f.dialog.open(&mut f.doc, f.open_btn);
        assert_eq!(
            f.dialog.handle_click(&mut f.doc, f.close_btn),
            EventResult::Consumed
        );
        assert!(!f.dialog.is_open());
        assert_eq!(f.doc.focused(), Some(f.open_btn));
    }

    #[test]
    fn repeated_open_and_close_are_noops() {
        let mut f = fixture();
        assert!(f.dialog.open(&mut f.doc, f.open_btn));
        assert!(!f.dialog.open(&mut f.doc, f.other_btn));
        assert_eq!(f.dialog.trigger(), Some(f.open_btn));
        assert_eq!(f.dialog.trap_installs(), 1);
        assert!(f.dialog.close(&mut f.doc, CloseReason::Programmatic));
        assert!(!f.dialog.close(&mut f.doc, CloseReason::Programmatic));
    }

    #[test]
    fn trap_installed_once_per_open() {
        let mut f = fixture();
        for round in 1..=3 {
            f.dialog.open(&mut f.doc, f.open_btn);
            assert_eq!(f.dialog.trap_installs(), round);
            f.dialog.close(&mut f.doc, CloseReason::Programmatic);
            assert!(!f.dialog.trap_active());
        }
    }

    #[test]
    fn removed_trigger_falls_back_to_body() {
        let mut f = fixture();
        f.dialog.open(&mut f.doc, f.open_btn);
        let main = f.doc.get_element_by_id("main-content").unwrap();
        f.doc.set_text(main, "");
        f.dialog.close(&mut f.doc, CloseReason::Programmatic);
        assert_eq!(f.doc.focused(), None);
        assert_eq!(f.doc.active_element(), f.doc.body());
    }

    #[test]
    fn empty_panel_holds_focus_on_container() {
        let mut f = fixture();
        for n in [f.first, f.middle, f.close_btn] {
            f.doc.toggle_attr(n, "disabled", true);
        }
        f.dialog.open(&mut f.doc, f.open_btn);
        let panel = f.dialog.panel();
        assert_eq!(f.doc.focused(), Some(panel));
        assert_eq!(
            f.dialog.handle_key(&mut f.doc, &tab()),
            EventResult::PreventDefault
        );
        assert_eq!(f.doc.focused(), Some(panel));
    }

    #[test]
    fn bare_panel_still_holds_focus() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.element("header").id("site-header").append_to(body);
        let main = doc.element("main").id("main-content").append_to(body);
        let trigger = doc.element("button").id("open-dialog").append_to(main);
        doc.element("footer").id("site-footer").append_to(body);
        let overlay = doc.element("div").id("dialog-overlay").append_to(body);
        let panel = doc.element("div").id("dialog").append_to(overlay);
        for id in ["dialog-confirm", "close-dialog"] {
            doc.element("button")
                .id(id)
                .attr("disabled", "")
                .append_to(panel);
        }
        let mut dialog =
            DialogController::attach(&mut doc, &DialogIds::default(), DialogConfig::default())
                .unwrap();
        assert!(doc.attr_is(panel, "tabindex", "-1"));

        doc.focus(trigger);
        dialog.open(&mut doc, trigger);
        assert_eq!(doc.focused(), Some(panel));
        assert_eq!(
            dialog.handle_key(&mut doc, &KeyEvent::new(KeyCode::Tab)),
            EventResult::PreventDefault
        );
        assert_eq!(doc.focused(), Some(panel));

        dialog.handle_key(&mut doc, &KeyEvent::new(KeyCode::Escape));
        assert_eq!(doc.focused(), Some(trigger));
    }

    #[test]
    fn existing_panel_tabindex_is_kept() {
        let mut f = fixture();
        f.doc.set_attr(f.dialog.panel(), "tabindex", "0");
        let dialog =
            DialogController::attach(&mut f.doc, &DialogIds::default(), DialogConfig::default())
                .unwrap();
        assert!(f.doc.attr_is(dialog.panel(), "tabindex", "0"));
    }

    #[test]
    fn click_inside_trigger_uses_trigger_for_restore() {
        let mut f = fixture();
        let icon = f.doc.element("span").text("+").append_to(f.open_btn);
        f.dialog.handle_click(&mut f.doc, icon);
        assert_eq!(f.dialog.trigger(), Some(f.open_btn));
    }
}
