#![forbid(unsafe_code)]

//! Tie-point storage, pairing, and point-level undo.
//!
//! ```text
//!  click on fixed image ──► add_fixed_point ──┐
//!  click on moving image ─► add_moving_point ─┤
//!                                             ▼
//!                     ┌──────────────────────────────────────┐
//!                     │ TiePointModel                        │
//!                     │   fixed:  [PointEntry ...]           │
//!                     │   moving: [PointEntry ...]           │
//!                     │   history: undo [..]  redo [..]      │
//!                     │   pairs = join(fixed, moving) by idx │
//!                     └──────────────────────────────────────┘
//!                                             │
//!                                    take_events() ──► UI
//! ```

pub mod event;
pub mod pair;
pub mod store;
pub mod undo;

pub use event::ModelEvent;
pub use pair::{PairIndex, PointEntry, TiePointPair};
pub use store::TiePointModel;
pub use undo::{ActiveSide, PointHistory, UndoEntry};
