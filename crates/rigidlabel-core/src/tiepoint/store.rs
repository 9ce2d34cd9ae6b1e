#![forbid(unsafe_code)]

//! The tie-point model: two point sequences, the derived pair list, and the
//! point-level undo log.
//!
//! # Invariants
//!
//! 1. No pair index appears twice within the same side's sequence.
//! 2. `pairs` always equals the join of `fixed` and `moving` by pair index,
//!    sorted ascending. It is rebuilt from scratch after every mutation.
//! 3. Every undo entry refers to a point that is currently present.
//!
//! # Gap filling
//!
//! A new point on one side first completes the lowest-index pair that has
//! only the opposite side placed. Only when no such pair exists is a new
//! index allocated (`1 + max`, or `0` when empty). Two pairs missing the
//! *same* side are never merged.

use std::collections::BTreeSet;

use crate::geometry::{Point2, Rect, Side};

use super::event::ModelEvent;
use super::pair::{PairIndex, PointEntry, TiePointPair};
use super::undo::{ActiveSide, PointHistory, UndoEntry};

/// Tie points between the fixed and the moving image.
#[derive(Debug, Clone, Default)]
pub struct TiePointModel {
    fixed: Vec<PointEntry>,
    moving: Vec<PointEntry>,
    history: PointHistory,
    pairs: Vec<TiePointPair>,
    events: Vec<ModelEvent>,
}

impl TiePointModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Point entry
    // ========================================================================

    /// Place a point on the fixed image. Returns the pair index it joined.
    pub fn add_fixed_point(&mut self, point: Point2) -> PairIndex {
        self.add_point(Side::Fixed, point)
    }

    /// Place a point on the moving image. Returns the pair index it joined.
    pub fn add_moving_point(&mut self, point: Point2) -> PairIndex {
        self.add_point(Side::Moving, point)
    }

    /// Place a point on `side`, completing the oldest pair that awaits it.
    pub fn add_point(&mut self, side: Side, point: Point2) -> PairIndex {
        let target = self
            .pairs
            .iter()
            .find(|pair| pair.awaits(side))
            .map_or_else(|| self.next_pair_index(), |pair| pair.index);

        self.entries_mut(side).push(PointEntry::new(target, point));
        self.history.record(UndoEntry::new(target, side, point));
        self.rebuild_pairs();

        tracing::debug!(
            target: "rigidlabel.model",
            pair_index = target,
            side = %side,
            x = point.x,
            y = point.y,
            "point added"
        );

        if self.has_both_points(target) {
            self.events.push(ModelEvent::PairCompleted(target));
        }
        self.events.push(ModelEvent::PointAdded {
            index: target,
            side,
        });
        self.events.push(ModelEvent::UndoRedoStateChanged);
        self.debug_check();

        target
    }

    /// Undo the most recent point add, whichever side it was on.
    ///
    /// Returns the undone entry, or `None` when there is nothing to undo.
    pub fn undo_last_point(&mut self) -> Option<UndoEntry> {
        let entry = self.history.pop_undo()?;
        let removed = self.take_point(entry.pair_index, entry.side);
        debug_assert!(removed.is_some(), "undo entry without a stored point");
        self.rebuild_pairs();

        tracing::debug!(
            target: "rigidlabel.model",
            pair_index = entry.pair_index,
            side = %entry.side,
            "point undone"
        );

        self.events.push(ModelEvent::PointRemoved {
            index: entry.pair_index,
            side: entry.side,
        });
        self.events.push(ModelEvent::UndoRedoStateChanged);
        self.debug_check();
        Some(entry)
    }

    /// Re-apply the most recently undone point add.
    ///
    /// The point goes back to its recorded pair index; no gap-filling scan.
    pub fn redo_last_point(&mut self) -> Option<UndoEntry> {
        let entry = self.history.pop_redo()?;
        self.entries_mut(entry.side)
            .push(PointEntry::new(entry.pair_index, entry.position));
        self.rebuild_pairs();

        tracing::debug!(
            target: "rigidlabel.model",
            pair_index = entry.pair_index,
            side = %entry.side,
            "point redone"
        );

        if self.has_both_points(entry.pair_index) {
            self.events.push(ModelEvent::PairCompleted(entry.pair_index));
        }
        self.events.push(ModelEvent::PointAdded {
            index: entry.pair_index,
            side: entry.side,
        });
        self.events.push(ModelEvent::UndoRedoStateChanged);
        self.debug_check();
        Some(entry)
    }

    // ========================================================================
    // Direct primitives
    // ========================================================================

    /// Remove the most recently added entry matching `(pair_index, side)`.
    ///
    /// The newest undo entry for the same point goes with it. Returns
    /// whether a point was removed.
    pub fn remove_point_direct(&mut self, pair_index: PairIndex, side: Side) -> bool {
        if self.take_point(pair_index, side).is_none() {
            return false;
        }
        let purged = self.history.purge_point(pair_index, side);
        self.rebuild_pairs();
        self.events.push(ModelEvent::PointRemoved {
            index: pair_index,
            side,
        });
        if purged {
            self.events.push(ModelEvent::UndoRedoStateChanged);
        }
        self.debug_check();
        true
    }

    /// Remove both sides of a pair.
    ///
    /// Point-level undo and redo entries referring to the pair are dropped so
    /// that the undo log never points at a missing point.
    pub fn remove_pair(&mut self, pair_index: PairIndex) -> Option<TiePointPair> {
        let pair = self.pair(pair_index)?;
        self.fixed.retain(|e| e.pair_index != pair_index);
        self.moving.retain(|e| e.pair_index != pair_index);
        let purged = self.history.purge_pair(pair_index);
        self.rebuild_pairs();

        tracing::debug!(
            target: "rigidlabel.model",
            pair_index,
            purged_history = purged,
            "pair removed"
        );

        self.events.push(ModelEvent::PairRemoved(pair_index));
        self.events.push(ModelEvent::UndoRedoStateChanged);
        self.debug_check();
        Some(pair)
    }

    /// Insert a (possibly partial) pair at `pair_index`.
    ///
    /// When the index is already used on either side the pair goes to
    /// [`next_pair_index`](Self::next_pair_index) instead. Point-level redo
    /// entries for the chosen index are dropped, since replaying them would
    /// place a second point on an occupied side. Returns the index used, or
    /// `None` when both sides are empty.
    pub fn insert_pair_direct(
        &mut self,
        pair_index: PairIndex,
        fixed: Option<Point2>,
        moving: Option<Point2>,
    ) -> Option<PairIndex> {
        if fixed.is_none() && moving.is_none() {
            return None;
        }
        let index = if self.contains_index(pair_index) {
            self.next_pair_index()
        } else {
            pair_index
        };

        if let Some(point) = fixed {
            self.fixed.push(PointEntry::new(index, point));
            self.events.push(ModelEvent::PointAdded {
                index,
                side: Side::Fixed,
            });
        }
        if let Some(point) = moving {
            self.moving.push(PointEntry::new(index, point));
            self.events.push(ModelEvent::PointAdded {
                index,
                side: Side::Moving,
            });
        }
        if self.history.purge_redo_for_pair(index) > 0 {
            self.events.push(ModelEvent::UndoRedoStateChanged);
        }
        self.rebuild_pairs();

        if self.has_both_points(index) {
            self.events.push(ModelEvent::PairCompleted(index));
        }
        self.debug_check();
        Some(index)
    }

    /// Append a complete pair at the next free index without recording
    /// point-level undo entries. Used when loading points from a file.
    pub fn add_complete_pair(&mut self, fixed: Point2, moving: Point2) -> PairIndex {
        let index = self.next_pair_index();
        self.fixed.push(PointEntry::new(index, fixed));
        self.moving.push(PointEntry::new(index, moving));
        self.history.clear_redo();
        self.rebuild_pairs();
        self.events.push(ModelEvent::PairCompleted(index));
        self.debug_check();
        index
    }

    /// Overwrite the position of an existing point (table cell edit).
    pub fn update_point(&mut self, pair_index: PairIndex, side: Side, point: Point2) -> bool {
        let Some(entry) = self
            .entries_mut(side)
            .iter_mut()
            .find(|e| e.pair_index == pair_index)
        else {
            return false;
        };
        entry.position = point;
        self.rebuild_pairs();

        tracing::debug!(
            target: "rigidlabel.model",
            pair_index,
            side = %side,
            x = point.x,
            y = point.y,
            "point edited"
        );
        true
    }

    /// Discard every point and both undo stacks.
    pub fn clear_all(&mut self) {
        if self.fixed.is_empty() && self.moving.is_empty() && !self.history.can_redo() {
            return;
        }
        self.fixed.clear();
        self.moving.clear();
        self.history.clear();
        self.pairs.clear();
        self.events.push(ModelEvent::Cleared);
        self.events.push(ModelEvent::UndoRedoStateChanged);
        tracing::debug!(target: "rigidlabel.model", "model cleared");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// `1 + max(pair index)` over both sides, or `0` when empty.
    ///
    /// Computed fresh on every call: deletions can lower the maximum.
    #[must_use]
    pub fn next_pair_index(&self) -> PairIndex {
        self.fixed
            .iter()
            .chain(&self.moving)
            .map(|e| e.pair_index)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// All pairs, sorted by index, partial ones included.
    #[must_use]
    pub fn pairs(&self) -> &[TiePointPair] {
        &self.pairs
    }

    #[must_use]
    pub fn pair(&self, pair_index: PairIndex) -> Option<TiePointPair> {
        self.pairs.iter().find(|p| p.index == pair_index).copied()
    }

    /// Pair at a table row (position in [`pairs`](Self::pairs)).
    #[must_use]
    pub fn pair_at_row(&self, row: usize) -> Option<TiePointPair> {
        self.pairs.get(row).copied()
    }

    pub fn complete_pairs(&self) -> impl Iterator<Item = &TiePointPair> + '_ {
        self.pairs.iter().filter(|p| p.is_complete())
    }

    /// Table row of the first pair whose `side` point lies within `radius`
    /// of `canonical`.
    #[must_use]
    pub fn row_at(&self, side: Side, canonical: Point2, radius: f64) -> Option<usize> {
        self.pairs
            .iter()
            .position(|pair| pair.get(side).is_some_and(|p| p.distance(canonical) <= radius))
    }

    /// Table rows of every pair whose `side` point lies inside `rect`.
    #[must_use]
    pub fn rows_in_rect(&self, side: Side, rect: Rect) -> Vec<usize> {
        self.pairs
            .iter()
            .enumerate()
            .filter(|(_, pair)| pair.get(side).is_some_and(|p| rect.contains(p)))
            .map(|(row, _)| row)
            .collect()
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn complete_pair_count(&self) -> usize {
        self.complete_pairs().count()
    }

    #[must_use]
    pub fn has_both_points(&self, pair_index: PairIndex) -> bool {
        self.pair(pair_index).is_some_and(|p| p.is_complete())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn fixed_entries(&self) -> &[PointEntry] {
        &self.fixed
    }

    #[must_use]
    pub fn moving_entries(&self) -> &[PointEntry] {
        &self.moving
    }

    #[must_use]
    pub fn entries(&self, side: Side) -> &[PointEntry] {
        match side {
            Side::Fixed => &self.fixed,
            Side::Moving => &self.moving,
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn active_side(&self) -> ActiveSide {
        self.history.active_side()
    }

    #[must_use]
    pub fn history(&self) -> &PointHistory {
        &self.history
    }

    /// Drain the queued notifications.
    pub fn take_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Full rebuild of the derived pair list.
    fn rebuild_pairs(&mut self) {
        let indices: BTreeSet<PairIndex> = self
            .fixed
            .iter()
            .chain(&self.moving)
            .map(|e| e.pair_index)
            .collect();

        self.pairs = indices
            .into_iter()
            .map(|index| TiePointPair {
                index,
                fixed: first_position(&self.fixed, index),
                moving: first_position(&self.moving, index),
            })
            .collect();
    }

    fn entries_mut(&mut self, side: Side) -> &mut Vec<PointEntry> {
        match side {
            Side::Fixed => &mut self.fixed,
            Side::Moving => &mut self.moving,
        }
    }

    fn contains_index(&self, pair_index: PairIndex) -> bool {
        self.fixed
            .iter()
            .chain(&self.moving)
            .any(|e| e.pair_index == pair_index)
    }

    /// Remove the newest matching entry from one side.
    fn take_point(&mut self, pair_index: PairIndex, side: Side) -> Option<PointEntry> {
        let entries = self.entries_mut(side);
        let pos = entries.iter().rposition(|e| e.pair_index == pair_index)?;
        Some(entries.remove(pos))
    }

    fn debug_check(&self) {
        debug_assert!(
            no_duplicate_indices(&self.fixed) && no_duplicate_indices(&self.moving),
            "pair index repeated within one side"
        );
    }
}

fn first_position(entries: &[PointEntry], index: PairIndex) -> Option<Point2> {
    entries
        .iter()
        .find(|e| e.pair_index == index)
        .map(|e| e.position)
}

fn no_duplicate_indices(entries: &[PointEntry]) -> bool {
    let mut seen = BTreeSet::new();
    entries.iter().all(|e| seen.insert(e.pair_index))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn first_point_allocates_pair_zero() {
        let mut model = TiePointModel::new();
        assert_eq!(model.next_pair_index(), 0);
        assert_eq!(model.add_fixed_point(p(10.0, 10.0)), 0);
        assert_eq!(model.pair_count(), 1);
        assert_eq!(model.complete_pair_count(), 0);
    }

    #[test]
    fn walkthrough_add_complete_add_undo() {
        let mut model = TiePointModel::new();

        assert_eq!(model.add_fixed_point(p(10.0, 10.0)), 0);
        assert!(!model.has_both_points(0));
        model.take_events();

        assert_eq!(model.add_moving_point(p(12.0, 11.0)), 0);
        assert!(model.has_both_points(0));
        assert!(model.take_events().contains(&ModelEvent::PairCompleted(0)));

        assert_eq!(model.add_fixed_point(p(20.0, 20.0)), 1);
        assert_eq!(model.pair_count(), 2);

        let undone = model.undo_last_point().expect("undo available");
        assert_eq!(undone.pair_index, 1);
        assert_eq!(undone.side, Side::Fixed);
        assert_eq!(model.pair_count(), 1);
        assert!(model.pair(1).is_none());
        assert!(model.has_both_points(0));
    }

    #[test]
    fn gap_fill_targets_lowest_incomplete_pair() {
        let mut model = TiePointModel::new();
        assert_eq!(model.add_moving_point(p(1.0, 1.0)), 0);
        // Moving again: pair 0 has no fixed point, so this is a new pair.
        assert_eq!(model.add_moving_point(p(2.0, 2.0)), 1);
        assert_eq!(model.add_moving_point(p(3.0, 3.0)), 2);
        model.undo_last_point();
        model.undo_last_point();
        model.add_moving_point(p(9.0, 9.0));
        // Now pairs 0 and 1 await fixed points.
        assert_eq!(model.add_fixed_point(p(0.0, 0.0)), 0);
        assert_eq!(model.add_fixed_point(p(0.0, 0.0)), 1);
        assert_eq!(model.add_fixed_point(p(0.0, 0.0)), 2);
    }

    #[test]
    fn gap_fill_skips_pairs_missing_the_same_side() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        // Pair 0 awaits a moving point, not a fixed one.
        assert_eq!(model.add_fixed_point(p(2.0, 2.0)), 1);
        assert_eq!(model.add_moving_point(p(3.0, 3.0)), 0);
    }

    #[test]
    fn redo_uses_recorded_index() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        model.add_moving_point(p(2.0, 2.0));
        model.undo_last_point();
        model.undo_last_point();
        assert!(model.is_empty());

        let first = model.redo_last_point().expect("redo available");
        assert_eq!(first, UndoEntry::new(0, Side::Fixed, p(1.0, 1.0)));
        let second = model.redo_last_point().expect("redo available");
        assert_eq!(second.side, Side::Moving);
        assert!(model.has_both_points(0));
        assert!(model.redo_last_point().is_none());
    }

    #[test]
    fn new_add_clears_redo() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        model.undo_last_point();
        assert!(model.can_redo());
        model.add_fixed_point(p(5.0, 5.0));
        assert!(!model.can_redo());
        assert!(model.redo_last_point().is_none());
    }

    #[test]
    fn undo_on_empty_is_a_no_op() {
        let mut model = TiePointModel::new();
        assert!(model.undo_last_point().is_none());
        assert!(model.redo_last_point().is_none());
        assert!(model.take_events().is_empty());
    }

    #[test]
    fn next_index_drops_after_deleting_max() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        model.add_moving_point(p(1.0, 1.0));
        model.add_fixed_point(p(2.0, 2.0));
        assert_eq!(model.next_pair_index(), 2);
        model.remove_pair(1);
        assert_eq!(model.next_pair_index(), 1);
    }

    #[test]
    fn remove_pair_purges_point_history() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        model.add_moving_point(p(2.0, 2.0));
        model.add_fixed_point(p(3.0, 3.0));

        let removed = model.remove_pair(0).expect("pair 0 exists");
        assert!(removed.is_complete());
        assert_eq!(model.history().undo_depth(), 1);

        // The only undoable point is pair 1's fixed point.
        let undone = model.undo_last_point().expect("undo available");
        assert_eq!(undone.pair_index, 1);
        assert!(model.undo_last_point().is_none());
    }

    #[test]
    fn insert_pair_direct_restores_index_when_free() {
        let mut model = TiePointModel::new();
        model.add_complete_pair(p(0.0, 0.0), p(0.0, 0.0));
        model.add_complete_pair(p(1.0, 1.0), p(1.0, 1.0));
        model.add_complete_pair(p(2.0, 2.0), p(2.0, 2.0));
        let removed = model.remove_pair(1).expect("pair 1 exists");

        let index = model.insert_pair_direct(1, removed.fixed, removed.moving);
        assert_eq!(index, Some(1));
        let indices: Vec<_> = model.pairs().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn insert_pair_direct_falls_back_when_occupied() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(0.0, 0.0));
        let index = model.insert_pair_direct(0, Some(p(5.0, 5.0)), None);
        assert_eq!(index, Some(1));
        assert_eq!(model.insert_pair_direct(7, None, None), None);
    }

    #[test]
    fn insert_pair_direct_drops_conflicting_redo() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(0.0, 0.0));
        model.undo_last_point();
        assert!(model.can_redo());

        model.insert_pair_direct(0, Some(p(1.0, 1.0)), Some(p(2.0, 2.0)));
        assert!(!model.can_redo());
        assert!(model.redo_last_point().is_none());
    }

    #[test]
    fn update_point_edits_in_place() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        assert!(model.update_point(0, Side::Fixed, p(4.0, 5.0)));
        assert_eq!(model.pair(0).and_then(|p| p.fixed), Some(p(4.0, 5.0)));
        assert!(!model.update_point(0, Side::Moving, p(4.0, 5.0)));
    }

    #[test]
    fn clear_all_empties_everything() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        model.add_moving_point(p(1.0, 1.0));
        model.undo_last_point();
        model.take_events();

        model.clear_all();
        assert!(model.is_empty());
        assert!(!model.can_undo());
        assert!(!model.can_redo());
        assert_eq!(model.active_side(), ActiveSide::None);
        assert_eq!(model.take_events()[0], ModelEvent::Cleared);
    }

    #[test]
    fn pairs_are_sorted_by_index() {
        let mut model = TiePointModel::new();
        model.insert_pair_direct(5, Some(p(5.0, 5.0)), None);
        model.insert_pair_direct(2, None, Some(p(2.0, 2.0)));
        model.insert_pair_direct(9, Some(p(9.0, 9.0)), Some(p(9.0, 9.0)));
        let indices: Vec<_> = model.pairs().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![2, 5, 9]);
        assert_eq!(model.pair_at_row(1).map(|p| p.index), Some(5));
    }

    #[test]
    fn remove_point_direct_takes_newest_match() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        assert!(model.remove_point_direct(0, Side::Fixed));
        assert!(!model.remove_point_direct(0, Side::Fixed));
        assert!(model.is_empty());
    }

    #[test]
    fn remove_point_direct_forgets_the_point_add() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        model.take_events();

        assert!(model.remove_point_direct(0, Side::Fixed));
        assert!(!model.can_undo());
        assert!(
            model
                .take_events()
                .contains(&ModelEvent::UndoRedoStateChanged)
        );
        assert!(model.undo_last_point().is_none());
        assert!(model.redo_last_point().is_none());
        assert!(model.is_empty());
    }

    #[test]
    fn remove_point_direct_keeps_other_undo_entries() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        model.add_moving_point(p(2.0, 2.0));
        model.add_fixed_point(p(3.0, 3.0));

        assert!(model.remove_point_direct(0, Side::Moving));
        assert_eq!(model.history().undo_depth(), 2);
        let undone = model.undo_last_point().expect("undo available");
        assert_eq!(undone.pair_index, 1);
        let undone = model.undo_last_point().expect("undo available");
        assert_eq!(undone, UndoEntry::new(0, Side::Fixed, p(1.0, 1.0)));
        assert!(model.is_empty());
    }

    #[test]
    fn row_at_picks_first_point_within_radius() {
        let mut model = TiePointModel::new();
        model.insert_pair_direct(0, Some(p(10.0, 10.0)), Some(p(100.0, 100.0)));
        model.insert_pair_direct(3, Some(p(15.0, 10.0)), None);
        model.insert_pair_direct(5, None, Some(p(40.0, 40.0)));

        assert_eq!(model.row_at(Side::Fixed, p(14.0, 10.0), 10.0), Some(0));
        assert_eq!(model.row_at(Side::Fixed, p(24.0, 10.0), 10.0), Some(1));
        assert_eq!(model.row_at(Side::Fixed, p(40.0, 40.0), 10.0), None);
        assert_eq!(model.row_at(Side::Moving, p(40.0, 46.0), 10.0), Some(2));
    }

    #[test]
    fn rows_in_rect_uses_one_side() {
        let mut model = TiePointModel::new();
        model.add_complete_pair(p(1.0, 1.0), p(50.0, 50.0));
        model.add_complete_pair(p(20.0, 20.0), p(2.0, 2.0));
        model.add_complete_pair(p(5.0, 5.0), p(60.0, 60.0));

        let rect = Rect::from_corners(p(10.0, 10.0), p(0.0, 0.0));
        assert_eq!(model.rows_in_rect(Side::Fixed, rect), vec![0, 2]);
        assert_eq!(model.rows_in_rect(Side::Moving, rect), vec![1]);
        assert!(model.rows_in_rect(Side::Moving, Rect::default()).is_empty());
    }

    #[test]
    fn active_side_tracks_last_touch() {
        let mut model = TiePointModel::new();
        model.add_fixed_point(p(1.0, 1.0));
        assert_eq!(model.active_side(), ActiveSide::Fixed);
        model.add_moving_point(p(1.0, 1.0));
        assert_eq!(model.active_side(), ActiveSide::Moving);
        model.undo_last_point();
        assert_eq!(model.active_side(), ActiveSide::Fixed);
    }
}
