#![forbid(unsafe_code)]

//! RigidLabel core.
//!
//! The data side of a tie-point labeling tool: points placed on a *fixed*
//! and a *moving* image are paired by index, edited with point-level
//! undo/redo, shown in either a top-left or a center origin, and fed to an
//! external solver whose answer is tracked by a [`TransformSession`].
//!
//! # Key Components
//!
//! - [`TiePointModel`] - point sequences, pairing, point-level undo/redo
//! - [`CoordinateConverter`] - canonical to display mapping per image
//! - [`TransformSession`] - transform validity and request generations
//! - [`io`] - CSV, matrix, and GT folder formats
//!
//! Nothing here performs network access or spawns threads; see
//! `rigidlabel-runtime` for the controller that drives these pieces.

pub mod coords;
pub mod geometry;
pub mod io;
pub mod session;
pub mod tiepoint;

pub use coords::{CoordinateConverter, OriginMode, ParseOriginModeError};
pub use geometry::{ImageSize, Point2, Rect, Side};
pub use session::{
    IDENTITY, Matrix3, ParseTransformModeError, RequestKind, RequestTicket, ResponseOutcome,
    RigidParams, TransformMode, TransformResult, TransformSession,
};
pub use tiepoint::{
    ActiveSide, ModelEvent, PairIndex, PointEntry, PointHistory, TiePointModel, TiePointPair,
    UndoEntry,
};
