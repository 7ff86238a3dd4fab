#![forbid(unsafe_code)]

//! Sort state and the cell comparator.
//!
//! A cell is a number when its trimmed text parses completely as a finite
//! float; anything else is text. Numbers compare numerically and text
//! compares with the [`Collator`]. Numbers sort before text so that a column
//! mixing both still gets a total order.

use std::cmp::Ordering;
use std::fmt;

use beacon_i18n::Collator;

use crate::messages::{SORT_ASCENDING, SORT_DESCENDING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// `aria-sort` token.
    #[must_use]
    pub const fn aria_value(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    pub(crate) const fn message_key(self) -> &'static str {
        match self {
            Self::Ascending => SORT_ASCENDING,
            Self::Descending => SORT_DESCENDING,
        }
    }

    /// Apply the direction to an ascending comparison.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.aria_value())
    }
}

/// Which column is active and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    column: Option<usize>,
    direction: SortDirection,
}

impl SortState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            column: None,
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Record a sort request: the active column flips, any other column
    /// becomes active ascending.
    pub fn advance(&mut self, column: usize) -> SortDirection {
        self.direction = if self.column == Some(column) {
            self.direction.flip()
        } else {
            SortDirection::Ascending
        };
        self.column = Some(column);
        self.direction
    }

    /// `aria-sort` value for `column`.
    #[must_use]
    pub fn aria_sort(&self, column: usize) -> &'static str {
        if self.column == Some(column) {
            self.direction.aria_value()
        } else {
            "none"
        }
    }
}

/// Sort key extracted from one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellKey {
    Number(f64),
    Text(String),
}

impl CellKey {
    /// Classify trimmed cell text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match parse_number(text) {
            Some(n) => Self::Number(n),
            None => Self::Text(text.to_owned()),
        }
    }
}

/// Parse `text` as a finite number, requiring the whole string to match.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Ascending comparison of two keys.
#[must_use]
pub fn compare_keys(a: &CellKey, b: &CellKey, collator: &Collator) -> Ordering {
    match (a, b) {
        (CellKey::Number(x), CellKey::Number(y)) => x.total_cmp(y),
        (CellKey::Text(x), CellKey::Text(y)) => collator.compare(x, y),
        (CellKey::Number(_), CellKey::Text(_)) => Ordering::Less,
        (CellKey::Text(_), CellKey::Number(_)) => Ordering::Greater,
    }
}

/// Stable permutation of `keys` in `direction`: `order[i]` is the index of
/// the key that lands at position `i`.
#[must_use]
pub fn sort_order(keys: &[CellKey], direction: SortDirection, collator: &Collator) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&i, &j| direction.apply(compare_keys(&keys[i], &keys[j], collator)));
    order
}
