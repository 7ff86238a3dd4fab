#![forbid(unsafe_code)]

//! Modal dialog with a keyboard focus trap.
//!
//! # Lifecycle
//!
//! ```text
//! Closed ──open(trigger)──▶ Open ──Escape / close control / backdrop──▶ Closed
//! ```
//!
//! Opening shows the overlay, makes the background landmarks inert, moves
//! focus to the first operable element in the panel and installs the trap.
//! Closing reverses all of that and puts focus back on the element that
//! opened the dialog.
//!
//! # Invariants
//!
//! 1. The trap is installed exactly while the dialog is open.
//! 2. While open, Tab and Shift+Tab never move focus outside the panel.
//! 3. The focus cycle is recomputed on every key event.
//! 4. After close, focus is on the remembered trigger, or on the body when
//!    that element can no longer take focus.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Markup element missing at attach | [`WireError`](crate::WireError), controller absent |
//! | Panel has no operable content | Focus held on the panel itself |
//! | Panel lacks `tabindex` at attach | `tabindex="-1"` added so it can take focus |
//! | Trigger removed while open | Focus falls back to the body on close |
//! | `open` while open, `close` while closed | No-op |

mod controller;
mod trap;

pub use controller::{CloseReason, DialogConfig, DialogController, DialogIds, DialogState};
pub use trap::{TrapStep, resolve_tab};
