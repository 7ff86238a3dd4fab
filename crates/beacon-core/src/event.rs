#![forbid(unsafe_code)]

//! Host input events.
//!
//! Events mirror the handful of DOM events the page reacts to: key presses,
//! pointer activation, text entry, focus loss, and form submission. Targets
//! are [`NodeId`]s in the page's [`Document`](crate::dom::Document).

use bitflags::bitflags;

use crate::dom::NodeId;

/// A single input event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event, dispatched against the focused element.
    Key(KeyEvent),
    /// Pointer activation whose hit target is the given node.
    Click(NodeId),
    /// Text entry replaced the value of a form control.
    Input { target: NodeId, value: String },
    /// The given node lost focus.
    Blur(NodeId),
    /// The given form was submitted.
    Submit(NodeId),
}

/// Outcome of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    /// The handler did not act on the event.
    #[default]
    Ignored,
    /// The handler acted; the host default action still runs.
    Consumed,
    /// The handler acted and the host must skip its default action.
    PreventDefault,
}

impl EventResult {
    /// Whether the host default action must be skipped.
    #[inline]
    #[must_use]
    pub const fn is_default_prevented(self) -> bool {
        matches!(self, Self::PreventDefault)
    }

    /// Whether any handler acted on the event.
    #[inline]
    #[must_use]
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Combine two results, keeping the stronger one.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::PreventDefault, _) | (_, Self::PreventDefault) => Self::PreventDefault,
            (Self::Consumed, _) | (_, Self::Consumed) => Self::Consumed,
            _ => Self::Ignored,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Press or auto-repeat (releases never drive behavior).
    #[inline]
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    /// Sequential-navigation direction for this key, if it is a cycle key.
    ///
    /// `Tab` moves forward, `Shift+Tab` and `BackTab` move backward.
    #[must_use]
    pub fn navigation(&self) -> Option<Direction> {
        match self.code {
            KeyCode::Tab if self.modifiers.contains(Modifiers::SHIFT) => Some(Direction::Backward),
            KeyCode::Tab => Some(Direction::Forward),
            KeyCode::BackTab => Some(Direction::Backward),
            _ => None,
        }
    }
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Tab,
    /// Shift+Tab as reported by hosts that fold the modifier into the key.
    BackTab,
    Escape,
    Enter,
    Char(char),
    /// Any key the page has no behavior for.
    Other,
}

/// Press/repeat/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Keyboard modifiers held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL = 0b0010;
        const ALT = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Sequential focus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}
