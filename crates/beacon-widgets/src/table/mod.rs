#![forbid(unsafe_code)]

//! Sortable data table with announced results.
//!
//! Activating a column's sort button sorts the body rows by that column.
//! Activating the same column again flips the direction; any other column
//! starts ascending. Afterwards exactly one header carries a non-`none`
//! `aria-sort`, and the live region re-announces the result even when the
//! text is unchanged.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Header or trigger id missing | [`WireError`](crate::WireError), controller absent |
//! | Row shorter than the column index | Missing cell sorts as empty text |
//! | Column index out of range | No-op, returns `None` |

mod controller;
mod sort;

pub use controller::{TableIds, TableSorter};
pub use sort::{CellKey, SortDirection, SortState, compare_keys, parse_number, sort_order};
