#![forbid(unsafe_code)]

//! RigidLabel runtime.
//!
//! Glue between the pure model in `rigidlabel-core` and the transform
//! service in `rigidlabel-client`:
//!
//! - [`Labeler`] - the controller behind the labeling window
//! - [`folder`] - stepping through the images of a directory
//! - [`undo`] - row-level command history
//! - [`worker`] - runs blocking service calls off the event thread

pub mod folder;
pub mod labeler;
pub mod undo;
pub mod worker;

pub use folder::{IMAGE_EXTENSIONS, ImageFolder};
pub use labeler::{
    HIT_RADIUS, HistoryOutcome, ImageInfo, Labeler, LabelerError, LabelerSettings, PlacedPoint,
    Result,
};
pub use undo::{HistoryConfig, HistoryManager, RemovePairCmd, UndoableCmd};
pub use worker::{Completion, ServiceJob, ServiceReply, ServiceWorker};
