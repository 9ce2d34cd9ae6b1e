#![forbid(unsafe_code)]

//! Point-level undo/redo log.
//!
//! Every atomic point add records one [`UndoEntry`]. The log is two LIFO
//! stacks with the usual linear-history rule:
//!
//! ```text
//! add A, add B          undo: [A, B]   redo: []
//! undo                  undo: [A]      redo: [B]
//! add C                 undo: [A, C]   redo: []     <- new action drops B
//! ```
//!
//! The log only records what happened; applying the inverse to the point
//! sequences is done by [`TiePointModel`](super::TiePointModel).

use crate::geometry::{Point2, Side};

use super::pair::PairIndex;

/// One recorded point add.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UndoEntry {
    pub pair_index: PairIndex,
    pub side: Side,
    pub position: Point2,
}

impl UndoEntry {
    #[must_use]
    pub const fn new(pair_index: PairIndex, side: Side, position: Point2) -> Self {
        Self {
            pair_index,
            side,
            position,
        }
    }
}

/// Which image was most recently touched, used for cursor and color hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveSide {
    #[default]
    None,
    Fixed,
    Moving,
}

impl From<Side> for ActiveSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Fixed => Self::Fixed,
            Side::Moving => Self::Moving,
        }
    }
}

/// The undo and redo stacks for single point adds.
#[derive(Debug, Clone, Default)]
pub struct PointHistory {
    undo: Vec<UndoEntry>,
    redo: Vec<UndoEntry>,
}

impl PointHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a forward action. Redoable history is discarded.
    pub fn record(&mut self, entry: UndoEntry) {
        self.redo.clear();
        self.undo.push(entry);
    }

    /// Take the newest undoable entry and park it on the redo stack.
    pub fn pop_undo(&mut self) -> Option<UndoEntry> {
        let entry = self.undo.pop()?;
        self.redo.push(entry);
        Some(entry)
    }

    /// Take the newest redoable entry and move it back to the undo stack.
    pub fn pop_redo(&mut self) -> Option<UndoEntry> {
        let entry = self.redo.pop()?;
        self.undo.push(entry);
        Some(entry)
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Drop every entry (undo and redo) that refers to `pair_index`.
    ///
    /// Returns how many entries were dropped.
    pub fn purge_pair(&mut self, pair_index: PairIndex) -> usize {
        let before = self.undo.len() + self.redo.len();
        self.undo.retain(|e| e.pair_index != pair_index);
        self.redo.retain(|e| e.pair_index != pair_index);
        before - self.undo.len() - self.redo.len()
    }

    /// Drop the newest undo entry for `(pair_index, side)`, if any.
    ///
    /// Redo entries for the same point are dropped too, since replaying them
    /// would restore a point that was deleted outside the log.
    pub fn purge_point(&mut self, pair_index: PairIndex, side: Side) -> bool {
        let matches = |e: &UndoEntry| e.pair_index == pair_index && e.side == side;
        let undone = match self.undo.iter().rposition(matches) {
            Some(pos) => {
                self.undo.remove(pos);
                true
            }
            None => false,
        };
        let before = self.redo.len();
        self.redo.retain(|e| !matches(e));
        undone || self.redo.len() != before
    }

    /// Drop redo entries that refer to `pair_index`.
    pub fn purge_redo_for_pair(&mut self, pair_index: PairIndex) -> usize {
        let before = self.redo.len();
        self.redo.retain(|e| e.pair_index != pair_index);
        before - self.redo.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Side of the newest undoable entry, or `None` when nothing is recorded.
    #[must_use]
    pub fn active_side(&self) -> ActiveSide {
        self.undo
            .last()
            .map_or(ActiveSide::None, |entry| entry.side.into())
    }

    /// Newest undoable entry without removing it.
    #[must_use]
    pub fn peek_undo(&self) -> Option<&UndoEntry> {
        self.undo.last()
    }

    /// Newest redoable entry without removing it.
    #[must_use]
    pub fn peek_redo(&self) -> Option<&UndoEntry> {
        self.redo.last()
    }
}
