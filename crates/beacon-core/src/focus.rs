#![forbid(unsafe_code)]

//! Operability rules and sequential focus navigation.
//!
//! # Definitions
//!
//! | Term | Rule |
//! |------|------|
//! | Natively operable | `a[href]`, `button`, `input` (not `type=hidden`), `select`, `textarea` |
//! | Explicitly operable | any element whose `tabindex` is not `-1` |
//! | Focusable | operable, or carrying any `tabindex` (including `-1`) |
//! | Disabled | `disabled` attribute on the element |
//! | Hidden | `hidden` or `aria-hidden="true"` on the element or an ancestor |
//! | Inert | `inert` on the element or an ancestor |
//!
//! # Invariants
//!
//! 1. [`focus_cycle`] is computed from the live tree on every call; nothing
//!    is cached, so content changes are always reflected.
//! 2. The cycle is in document order.
//! 3. Inert elements are never operable or focusable.

use crate::dom::{Document, NodeId};
use crate::event::Direction;

/// Whether keyboard navigation reaches this element by its own nature or by
/// an explicit non-negative `tabindex`.
#[must_use]
pub fn is_operable(doc: &Document, node: NodeId) -> bool {
    if let Some(tabindex) = doc.attr(node, "tabindex") {
        return tabindex.trim() != "-1";
    }
    is_natively_operable(doc, node)
}

fn is_natively_operable(doc: &Document, node: NodeId) -> bool {
    match doc.tag(node) {
        "a" => doc.has_attr(node, "href"),
        "button" | "select" | "textarea" => true,
        "input" => !doc
            .attr(node, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        _ => false,
    }
}

/// Whether `node` carries the `disabled` attribute.
#[must_use]
pub fn is_disabled(doc: &Document, node: NodeId) -> bool {
    doc.has_attr(node, "disabled")
}

fn marks_hidden(doc: &Document, node: NodeId) -> bool {
    doc.has_attr(node, "hidden") || doc.attr_is(node, "aria-hidden", "true")
}

/// Whether `node` or an ancestor strictly below `scope` is marked hidden.
///
/// `scope` itself is not considered, so a container can be checked for
/// hidden content independently of its own visibility state.
#[must_use]
pub fn is_hidden_within(doc: &Document, scope: NodeId, node: NodeId) -> bool {
    if node == scope {
        return false;
    }
    if marks_hidden(doc, node) {
        return true;
    }
    doc.ancestors(node)
        .take_while(|&a| a != scope)
        .any(|a| marks_hidden(doc, a))
}

/// Whether `node` or any ancestor is marked hidden.
#[must_use]
pub fn is_hidden(doc: &Document, node: NodeId) -> bool {
    marks_hidden(doc, node) || doc.ancestors(node).any(|a| marks_hidden(doc, a))
}

/// Whether `node` or any ancestor is inert.
#[must_use]
pub fn is_inert(doc: &Document, node: NodeId) -> bool {
    doc.has_attr(node, "inert") || doc.ancestors(node).any(|a| doc.has_attr(a, "inert"))
}

/// Whether programmatic focus may land on `node`.
#[must_use]
pub fn is_focusable(doc: &Document, node: NodeId) -> bool {
    if is_inert(doc, node) || is_disabled(doc, node) || is_hidden(doc, node) {
        return false;
    }
    doc.has_attr(node, "tabindex") || is_natively_operable(doc, node)
}

/// Ordered keyboard-operable elements inside `root`.
///
/// An element is included when it is operable, not disabled, not inert, and
/// not nested in anything marked hidden below `root`.
#[must_use]
pub fn focus_cycle(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .into_iter()
        .filter(|&n| {
            is_operable(doc, n)
                && !is_disabled(doc, n)
                && !is_inert(doc, n)
                && !is_hidden_within(doc, root, n)
        })
        .collect()
}

/// Every element sequential navigation can reach in the whole document.
#[must_use]
pub fn tab_order(doc: &Document) -> Vec<NodeId> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&n| {
            is_operable(doc, n) && !is_disabled(doc, n) && !is_inert(doc, n) && !is_hidden(doc, n)
        })
        .collect()
}

/// The element the host's default Tab action moves to from `from`.
///
/// Walks the document tab order, wrapping at either end. When `from` is not
/// itself in the tab order, the nearest element after (or before) it in
/// document order is chosen. Returns `None` when nothing is reachable.
#[must_use]
pub fn next_in_sequence(doc: &Document, from: NodeId, direction: Direction) -> Option<NodeId> {
    let order = tab_order(doc);
    if order.is_empty() {
        return None;
    }
    if let Some(pos) = order.iter().position(|&n| n == from) {
        let len = order.len();
        let next = match direction {
            Direction::Forward => (pos + 1) % len,
            Direction::Backward => (pos + len - 1) % len,
        };
        return Some(order[next]);
    }

    let all = doc.descendants(doc.root());
    let from_pos = all.iter().position(|&n| n == from);
    let doc_pos = |n: NodeId| all.iter().position(|&m| m == n);
    match (direction, from_pos) {
        (Direction::Forward, Some(p)) => order
            .iter()
            .copied()
            .find(|&n| doc_pos(n).is_some_and(|q| q > p))
            .or_else(|| order.first().copied()),
        (Direction::Backward, Some(p)) => order
            .iter()
            .rev()
            .copied()
            .find(|&n| doc_pos(n).is_some_and(|q| q < p))
            .or_else(|| order.last().copied()),
        (Direction::Forward, None) => order.first().copied(),
        (Direction::Backward, None) => order.last().copied(),
    }
}
