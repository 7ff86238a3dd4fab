#![forbid(unsafe_code)]

//! Page behavior controllers for Beacon.
//!
//! Each controller attaches to a fixed set of elements by id, owns that
//! region of the document exclusively, and reacts to host events:
//!
//! - [`modal::DialogController`]: modal dialog with focus trap and restore.
//! - [`form::FormValidator`]: per-field validation with announced errors.
//! - [`table::TableSorter`]: sortable table with a re-announcing live region.
//!
//! Controllers never call one another. A controller whose markup is
//! incomplete fails to attach with a [`WireError`] and is simply absent.

pub mod form;
pub mod live_region;
pub mod messages;
pub mod modal;
pub mod table;

pub use form::{FieldError, FieldKind, FormIds, FormValidator, SubmitOutcome, ValidationRules};
pub use live_region::{Announcer, AnnouncerConfig};
pub use messages::Messages;
pub use modal::{CloseReason, DialogConfig, DialogController, DialogIds};
pub use table::{SortDirection, SortState, TableIds, TableSorter};

use std::fmt;
use std::time::Duration;

use beacon_core::{Document, DomError, Event, EventResult, NodeId};

/// Failure to attach a controller to its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A required element id is not in the document.
    MissingElement {
        controller: &'static str,
        id: String,
    },
    /// Column headers and sort triggers do not pair up.
    ColumnMismatch { headers: usize, triggers: usize },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement { controller, id } => {
                write!(f, "{controller}: required element '#{id}' not found")
            }
            Self::ColumnMismatch { headers, triggers } => write!(
                f,
                "table: {headers} column headers but {triggers} sort triggers"
            ),
        }
    }
}

impl std::error::Error for WireError {}

/// Resolve a required id for `controller`.
pub(crate) fn require(
    doc: &Document,
    controller: &'static str,
    id: &str,
) -> Result<NodeId, WireError> {
    doc.require(id).map_err(|err| match err {
        DomError::MissingElement(id) => WireError::MissingElement { controller, id },
        _ => WireError::MissingElement {
            controller,
            id: id.to_owned(),
        },
    })
}

/// Resolve every id in `ids`, failing on the first missing one.
pub(crate) fn require_all(
    doc: &Document,
    controller: &'static str,
    ids: &[String],
) -> Result<Vec<NodeId>, WireError> {
    ids.iter().map(|id| require(doc, controller, id)).collect()
}

/// A controller bound to a region of the document.
pub trait Controller {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// React to a host event. `now` is the page clock.
    fn handle_event(&mut self, doc: &mut Document, event: &Event, now: Duration) -> EventResult;

    /// Run delayed work that has come due by `now`.
    fn tick(&mut self, _doc: &mut Document, _now: Duration) {}

    /// Earliest pending delayed work, if any.
    fn next_deadline(&self) -> Option<Duration> {
        None
    }
}
