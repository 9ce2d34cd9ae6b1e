#![forbid(unsafe_code)]

//! Notifications queued by the tie-point model for the UI to drain.

use crate::geometry::Side;

use super::pair::PairIndex;

/// Something observable changed in the tie-point model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// A point was placed (by a click, a redo, or a direct insertion).
    PointAdded { index: PairIndex, side: Side },
    /// A single point was taken away (undo or direct removal).
    PointRemoved { index: PairIndex, side: Side },
    /// The pair now has both sides placed.
    PairCompleted(PairIndex),
    /// A whole row was deleted.
    PairRemoved(PairIndex),
    /// Every point and all history were discarded.
    Cleared,
    /// `can_undo` / `can_redo` may have changed.
    UndoRedoStateChanged,
}
