#![forbid(unsafe_code)]

//! Conversion between canonical pixel coordinates and display coordinates.
//!
//! Points are stored canonically (top-left origin) no matter which origin
//! the user has selected. Display coordinates are derived on demand:
//!
//! | Mode      | display                         |
//! |-----------|---------------------------------|
//! | `TopLeft` | `canonical`                     |
//! | `Center`  | `canonical - (width/2, height/2)` |
//!
//! The offset is per side: the fixed and moving images may differ in size.
//! An image that is not loaded yet has a zero offset. Callers must always
//! convert from canonical storage, never from a previously converted value,
//! so that loading an image later cannot make coordinates drift.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{ImageSize, Point2, Side};
use crate::tiepoint::TiePointPair;

/// Where the origin of displayed and exported coordinates sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginMode {
    /// Image top-left corner (the canonical frame).
    TopLeft,
    /// Image center.
    #[default]
    Center,
}

impl OriginMode {
    /// Name used in the CSV header (`# Origin Mode: ...`).
    #[must_use]
    pub const fn header_name(self) -> &'static str {
        match self {
            Self::TopLeft => "TopLeft",
            Self::Center => "Center",
        }
    }

    #[must_use]
    pub const fn is_center(self) -> bool {
        matches!(self, Self::Center)
    }
}

impl fmt::Display for OriginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

/// Error for an unrecognised origin mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown origin mode: {0:?}")]
pub struct ParseOriginModeError(pub String);

impl FromStr for OriginMode {
    type Err = ParseOriginModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "topleft" => Ok(Self::TopLeft),
            "center" | "centre" => Ok(Self::Center),
            _ => Err(ParseOriginModeError(s.to_string())),
        }
    }
}

/// Converts positions between canonical and display space for both images.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateConverter {
    mode: OriginMode,
    fixed_size: Option<ImageSize>,
    moving_size: Option<ImageSize>,
}

impl CoordinateConverter {
    #[must_use]
    pub const fn new(mode: OriginMode) -> Self {
        Self {
            mode,
            fixed_size: None,
            moving_size: None,
        }
    }

    /// Builder-style image sizes.
    #[must_use]
    pub fn with_sizes(mut self, fixed: Option<ImageSize>, moving: Option<ImageSize>) -> Self {
        self.fixed_size = fixed;
        self.moving_size = moving;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> OriginMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: OriginMode) {
        self.mode = mode;
    }

    #[must_use]
    pub const fn image_size(&self, side: Side) -> Option<ImageSize> {
        match side {
            Side::Fixed => self.fixed_size,
            Side::Moving => self.moving_size,
        }
    }

    /// Record (or forget, with `None`) the size of one image.
    pub fn set_image_size(&mut self, side: Side, size: Option<ImageSize>) {
        match side {
            Side::Fixed => self.fixed_size = size,
            Side::Moving => self.moving_size = size,
        }
    }

    /// Image center for a side, `(0, 0)` when the image is not loaded.
    #[must_use]
    pub fn center(&self, side: Side) -> Point2 {
        self.image_size(side).map_or_else(Point2::default, ImageSize::center)
    }

    /// Amount subtracted from canonical coordinates in the current mode.
    #[must_use]
    pub fn offset(&self, side: Side) -> Point2 {
        self.offset_for(self.mode, side)
    }

    /// Offset that `mode` would use for `side`.
    #[must_use]
    pub fn offset_for(&self, mode: OriginMode, side: Side) -> Point2 {
        match mode {
            OriginMode::TopLeft => Point2::default(),
            OriginMode::Center => self.center(side),
        }
    }

    #[must_use]
    pub fn to_display(&self, side: Side, canonical: Point2) -> Point2 {
        canonical - self.offset(side)
    }

    #[must_use]
    pub fn to_canonical(&self, side: Side, display: Point2) -> Point2 {
        display + self.offset(side)
    }

    /// A pair with both sides mapped into display space.
    #[must_use]
    pub fn pair_to_display(&self, pair: &TiePointPair) -> TiePointPair {
        TiePointPair {
            index: pair.index,
            fixed: pair.fixed.map(|p| self.to_display(Side::Fixed, p)),
            moving: pair.moving.map(|p| self.to_display(Side::Moving, p)),
        }
    }

    /// On-screen label for a freshly placed point, e.g. `X: 12.0, Y: -3.5`.
    #[must_use]
    pub fn coordinate_label(&self, side: Side, canonical: Point2) -> String {
        let shown = self.to_display(side, canonical);
        format!("X: {:.1}, Y: {:.1}", shown.x, shown.y)
    }
}
