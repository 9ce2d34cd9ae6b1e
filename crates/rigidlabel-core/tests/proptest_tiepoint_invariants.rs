//! Property-based invariant tests for the tie-point model and the
//! coordinate converter.
//!
//! 1. No pair index appears twice on the same side.
//! 2. The pair list is the sorted join of both sides.
//! 3. A new point completes the lowest-index pair awaiting its side.
//! 4. Undoing every add empties the model; redoing them restores it.
//! 5. A new add after an undo leaves nothing to redo.
//! 6. Display -> canonical -> display is stable.
//! 7. Every undo entry refers to a point that is still stored.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rigidlabel_core::{
    CoordinateConverter, ImageSize, OriginMode, Point2, Side, TiePointModel, TiePointPair,
};

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Add(Side, Point2),
    Undo,
    Redo,
    RemovePair(u32),
    RemovePoint(u32, Side),
    Reinsert(u32, Point2),
}

fn point() -> impl Strategy<Value = Point2> {
    (-500.0f64..5000.0, -500.0f64..5000.0).prop_map(|(x, y)| Point2::new(x, y))
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Fixed), Just(Side::Moving)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (side(), point()).prop_map(|(s, p)| Op::Add(s, p)),
        2 => Just(Op::Undo),
        2 => Just(Op::Redo),
        1 => (0u32..8).prop_map(Op::RemovePair),
        1 => (0u32..8, side()).prop_map(|(i, s)| Op::RemovePoint(i, s)),
        1 => (0u32..8, point()).prop_map(|(i, p)| Op::Reinsert(i, p)),
    ]
}

fn apply(model: &mut TiePointModel, op: &Op) {
    match op {
        Op::Add(side, p) => {
            model.add_point(*side, *p);
        }
        Op::Undo => {
            model.undo_last_point();
        }
        Op::Redo => {
            model.redo_last_point();
        }
        Op::RemovePair(i) => {
            model.remove_pair(*i);
        }
        Op::RemovePoint(i, side) => {
            model.remove_point_direct(*i, *side);
        }
        Op::Reinsert(i, p) => {
            model.insert_pair_direct(*i, Some(*p), None);
        }
    }
}

fn expected_pairs(model: &TiePointModel) -> Vec<TiePointPair> {
    let indices: BTreeSet<u32> = model
        .fixed_entries()
        .iter()
        .chain(model.moving_entries())
        .map(|e| e.pair_index)
        .collect();
    indices
        .into_iter()
        .map(|index| TiePointPair {
            index,
            fixed: model
                .fixed_entries()
                .iter()
                .find(|e| e.pair_index == index)
                .map(|e| e.position),
            moving: model
                .moving_entries()
                .iter()
                .find(|e| e.pair_index == index)
                .map(|e| e.position),
        })
        .collect()
}

fn unique_indices(model: &TiePointModel, side: Side) -> bool {
    let entries = model.entries(side);
    let set: BTreeSet<u32> = entries.iter().map(|e| e.pair_index).collect();
    set.len() == entries.len()
}

// ═══════════════════════════════════════════════════════════════════════════
// 1-2. Pairing invariant under arbitrary edits
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn pairing_invariant_holds(ops in prop::collection::vec(op(), 0..60)) {
        let mut model = TiePointModel::new();
        for op in &ops {
            apply(&mut model, op);
            prop_assert!(unique_indices(&model, Side::Fixed), "duplicate fixed index after {:?}", op);
            prop_assert!(unique_indices(&model, Side::Moving), "duplicate moving index after {:?}", op);
            let expected = expected_pairs(&model);
            prop_assert_eq!(model.pairs(), expected.as_slice());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 3. Gap filling picks the lowest awaiting index
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn gap_fill_targets_lowest_awaiting_pair(
        ops in prop::collection::vec(op(), 0..40),
        side in side(),
        p in point(),
    ) {
        let mut model = TiePointModel::new();
        for op in &ops {
            apply(&mut model, op);
        }
        let expected = model
            .pairs()
            .iter()
            .find(|pair| pair.get(side).is_none() && pair.get(side.opposite()).is_some())
            .map_or_else(|| model.next_pair_index(), |pair| pair.index);

        prop_assert_eq!(model.add_point(side, p), expected);
        prop_assert!(!model.can_redo());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 4-5. Undo/redo round trip and redo invalidation
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_all_then_redo_all_restores(adds in prop::collection::vec((side(), point()), 1..30)) {
        let mut model = TiePointModel::new();
        for (side, p) in &adds {
            model.add_point(*side, *p);
        }
        let snapshot = model.pairs().to_vec();

        for _ in &adds {
            prop_assert!(model.undo_last_point().is_some());
        }
        prop_assert!(model.is_empty());
        prop_assert!(model.undo_last_point().is_none());

        for _ in &adds {
            prop_assert!(model.redo_last_point().is_some());
        }
        prop_assert_eq!(model.pairs(), snapshot.as_slice());
        prop_assert!(!model.can_redo());
    }

    #[test]
    fn new_add_after_undo_clears_redo(
        adds in prop::collection::vec((side(), point()), 1..20),
        undos in 1usize..20,
        extra in (side(), point()),
    ) {
        let mut model = TiePointModel::new();
        for (side, p) in &adds {
            model.add_point(*side, *p);
        }
        for _ in 0..undos.min(adds.len()) {
            model.undo_last_point();
        }
        prop_assert!(model.can_redo());

        model.add_point(extra.0, extra.1);
        prop_assert!(!model.can_redo());
        prop_assert!(model.redo_last_point().is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 6. Coordinate round trip
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn display_round_trip_is_stable(
        p in point(),
        w in 1u32..8000,
        h in 1u32..8000,
        center in any::<bool>(),
        side in side(),
    ) {
        let mode = if center { OriginMode::Center } else { OriginMode::TopLeft };
        let size = Some(ImageSize::new(w, h));
        let conv = CoordinateConverter::new(mode).with_sizes(size, size);

        let once = conv.to_display(side, p);
        let twice = conv.to_display(side, conv.to_canonical(side, once));
        prop_assert!(once.approx_eq(twice, 1e-9), "{:?} vs {:?}", once, twice);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 7. The undo log never outlives its points
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_entries_point_at_stored_points(ops in prop::collection::vec(op(), 0..60)) {
        let mut model = TiePointModel::new();
        for op in &ops {
            apply(&mut model, op);
        }
        while let Some(entry) = model.history().peek_undo().copied() {
            let stored = model
                .entries(entry.side)
                .iter()
                .any(|e| e.pair_index == entry.pair_index);
            prop_assert!(stored, "dangling undo entry {:?}", entry);
            prop_assert_eq!(model.undo_last_point(), Some(entry));
        }
        prop_assert!(!model.can_undo());
    }
}
