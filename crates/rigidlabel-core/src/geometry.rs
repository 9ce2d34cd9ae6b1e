#![forbid(unsafe_code)]

//! Plain geometric value types shared by every layer.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A 2D position in pixel units.
///
/// Inside the tie-point model positions are always canonical: top-left
/// origin, `x` growing rightward (columns), `y` growing downward (rows).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Create a point from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both components are within `eps` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Point2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// An axis-aligned rectangle spanned by two corners.
///
/// The corners may be given in any order; containment checks use the
/// normalized extent and include the border.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    /// Rectangle between two opposite corners, e.g. a rubber-band drag.
    #[must_use]
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    #[must_use]
    pub fn contains(&self, p: Point2) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }
}

/// Pixel dimensions of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Geometric center in pixel coordinates (half width, half height).
    #[must_use]
    pub fn center(self) -> Point2 {
        Point2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which image of the pair a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The reference image.
    Fixed,
    /// The image being aligned to the reference.
    Moving,
}

impl Side {
    /// The other side of the pair.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Fixed => Self::Moving,
            Self::Moving => Self::Fixed,
        }
    }

    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Moving => "moving",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_odd_sized_image_is_fractional() {
        let size = ImageSize::new(641, 480);
        assert_eq!(size.center(), Point2::new(320.5, 240.0));
    }

    #[test]
    fn side_opposite_round_trips() {
        assert_eq!(Side::Fixed.opposite(), Side::Moving);
        assert_eq!(Side::Moving.opposite().opposite(), Side::Moving);
    }

    #[test]
    fn point_arithmetic() {
        let a = Point2::new(10.0, 4.0);
        let b = Point2::new(2.5, 1.0);
        assert_eq!(a - b, Point2::new(7.5, 3.0));
        assert_eq!(a - b + b, a);
        assert!((Point2::new(0.0, 0.0).distance(Point2::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rect_normalizes_dragged_corners() {
        let rect = Rect::from_corners(Point2::new(10.0, 2.0), Point2::new(-4.0, 8.0));
        assert_eq!(rect.min, Point2::new(-4.0, 2.0));
        assert_eq!(rect.max, Point2::new(10.0, 8.0));
        assert!(rect.contains(Point2::new(10.0, 8.0)));
        assert!(rect.contains(Point2::new(0.0, 5.0)));
        assert!(!rect.contains(Point2::new(0.0, 8.5)));
    }

    #[test]
    fn display_uses_one_decimal() {
        assert_eq!(Point2::new(1.26, -3.0).to_string(), "(1.3, -3.0)");
        assert_eq!(ImageSize::new(800, 600).to_string(), "800x600");
    }
}
