#![forbid(unsafe_code)]

//! Row-level undo/redo.
//!
//! The tie-point model records single point adds itself. Everything coarser
//! goes through the command stack in this module, and the controller asks
//! the two providers in a fixed order:
//!
//! ```text
//!            undo request
//!                 │
//!      ┌──────────▼───────────┐   yes   ┌───────────────────────┐
//!      │ model.can_undo()?    ├────────►│ model.undo_last_point │
//!      └──────────┬───────────┘         └───────────────────────┘
//!                 │ no
//!      ┌──────────▼───────────┐   yes   ┌───────────────────────┐
//!      │ history.can_undo()?  ├────────►│ history.undo(model)   │
//!      └──────────┬───────────┘         └───────────────────────┘
//!                 │ no
//!          "nothing to undo"
//! ```
//!
//! Redo follows the same order.

pub mod command;
pub mod history;

pub use command::{
    CommandBatch, CommandError, CommandMetadata, CommandResult, CommandSource, RemovePairCmd,
    UndoableCmd,
};
pub use history::{HistoryConfig, HistoryManager};
