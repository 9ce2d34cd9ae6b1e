#![forbid(unsafe_code)]

//! Stored point entries and the derived pair view.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point2, Side};

/// Pair indices are small non-negative integers allocated monotonically.
pub type PairIndex = u32;

/// One placed point on one side, tagged with the pair it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointEntry {
    pub pair_index: PairIndex,
    /// Canonical (top-left origin) pixel position.
    pub position: Point2,
}

impl PointEntry {
    #[must_use]
    pub const fn new(pair_index: PairIndex, position: Point2) -> Self {
        Self {
            pair_index,
            position,
        }
    }
}

/// A possibly partial correspondence between the two images.
///
/// Pairs are never stored; they are the join of the fixed and moving entry
/// sequences by pair index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiePointPair {
    pub index: PairIndex,
    pub fixed: Option<Point2>,
    pub moving: Option<Point2>,
}

impl TiePointPair {
    /// An empty pair with the given index.
    #[must_use]
    pub const fn new(index: PairIndex) -> Self {
        Self {
            index,
            fixed: None,
            moving: None,
        }
    }

    #[must_use]
    pub const fn has_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    #[must_use]
    pub const fn has_moving(&self) -> bool {
        self.moving.is_some()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.has_fixed() && self.has_moving()
    }

    /// Position on the given side, if placed.
    #[must_use]
    pub const fn get(&self, side: Side) -> Option<Point2> {
        match side {
            Side::Fixed => self.fixed,
            Side::Moving => self.moving,
        }
    }

    /// Whether this pair is waiting for a point on `side` (the opposite side
    /// is placed, this one is not).
    #[must_use]
    pub const fn awaits(&self, side: Side) -> bool {
        match side {
            Side::Fixed => self.has_moving() && !self.has_fixed(),
            Side::Moving => self.has_fixed() && !self.has_moving(),
        }
    }

    /// Both positions, when the pair is complete.
    #[must_use]
    pub fn complete_points(&self) -> Option<(Point2, Point2)> {
        Some((self.fixed?, self.moving?))
    }
}
