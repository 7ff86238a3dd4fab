#![forbid(unsafe_code)]

//! Core types for Beacon: an in-memory document addressed by stable element
//! identifiers, host input events, focus/operability rules, and a
//! deterministic timer queue.
//!
//! The page is host-driven: a browser shim, a test, or a fuzzer delivers
//! [`event::Event`]s, controllers mutate the [`dom::Document`], and the host
//! reads the resulting state back out.

pub mod dom;
pub mod event;
pub mod focus;
pub mod timer;

pub use dom::{Document, DocumentSnapshot, DomError, ElementBuilder, ElementSnapshot, NodeId};
pub use event::{Direction, Event, EventResult, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use timer::{TimerId, TimerQueue};
