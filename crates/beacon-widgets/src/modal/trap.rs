#![forbid(unsafe_code)]

//! Tab wrapping at the edges of a focus cycle.

use beacon_core::{Direction, NodeId};

/// What the trap does with one Tab press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapStep {
    /// Let the host's default navigation run.
    PassThrough,
    /// Suppress the default and focus this element.
    MoveTo(NodeId),
    /// Suppress the default and keep focus on the container.
    HoldContainer,
}

/// Decide how a Tab press in `direction` is handled given the current
/// `cycle` and `focused` element.
///
/// Wrapping happens only at the edges; interior moves are left to the host.
/// Focus that is somehow outside the cycle is pulled back to the edge the
/// user is moving towards.
#[must_use]
pub fn resolve_tab(cycle: &[NodeId], focused: Option<NodeId>, direction: Direction) -> TrapStep {
    let (Some(&first), Some(&last)) = (cycle.first(), cycle.last()) else {
        return TrapStep::HoldContainer;
    };
    let Some(current) = focused.filter(|f| cycle.contains(f)) else {
        return TrapStep::MoveTo(match direction {
            Direction::Forward => first,
            Direction::Backward => last,
        });
    };
    match direction {
        Direction::Forward if current == last => TrapStep::MoveTo(first),
        Direction::Backward if current == first => TrapStep::MoveTo(last),
        _ => TrapStep::PassThrough,
    }
}
