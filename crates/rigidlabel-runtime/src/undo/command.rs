#![forbid(unsafe_code)]

//! Undoable commands for bulk edits of the tie-point model.
//!
//! Point placement has its own fine-grained log inside the model. Edits that
//! touch whole rows (multi-row delete) are expressed as commands here and
//! kept on a separate [`HistoryManager`](super::HistoryManager).
//!
//! # Invariants
//!
//! - `execute()` followed by `undo()` restores the prior pairs, including
//!   their indices when those are still free
//! - `undo()` followed by `redo()` restores the executed state
//! - `size_bytes()` is what the history charges against its budget
//!
//! # Failure Modes
//!
//! - **Stale row**: the pair a command targets was removed by other means
//!   - Execute reports [`CommandError::PairNotFound`] and changes nothing
//! - **Occupied index**: the original index was reused before undo
//!   - The pair is restored at the next free index and the command follows
//!     it there, so a later redo removes the right pair

use std::fmt;
use std::time::Instant;

use rigidlabel_core::{PairIndex, TiePointModel, TiePointPair};

/// Who triggered a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandSource {
    /// Direct user action.
    #[default]
    User,
    /// Issued by application code, e.g. while loading a label.
    Programmatic,
}

/// Metadata attached to every command for tracing and UI display.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// Text for the undo/redo menu entries.
    pub description: String,
    pub timestamp: Instant,
    pub source: CommandSource,
    /// Set on commands that belong to a [`CommandBatch`].
    pub batch_id: Option<u64>,
}

impl CommandMetadata {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            timestamp: Instant::now(),
            source: CommandSource::User,
            batch_id: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: CommandSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_batch(mut self, batch_id: u64) -> Self {
        self.batch_id = Some(batch_id);
        self
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.description.len()
    }
}

impl Default for CommandMetadata {
    fn default() -> Self {
        Self::new("Unknown")
    }
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("tie point pair {0} not found")]
    PairNotFound(PairIndex),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("{0}")]
    Other(String),
}

/// A reversible edit of a target `T`.
///
/// The target is passed in on every call instead of being captured, so a
/// command never outlives or aliases the state it edits.
pub trait UndoableCmd<T>: Send + Sync {
    fn execute(&mut self, target: &mut T) -> CommandResult;

    fn undo(&mut self, target: &mut T) -> CommandResult;

    fn redo(&mut self, target: &mut T) -> CommandResult {
        self.execute(target)
    }

    fn description(&self) -> &str {
        &self.metadata().description
    }

    /// Size of this command in bytes for history budgeting.
    fn size_bytes(&self) -> usize;

    fn metadata(&self) -> &CommandMetadata;

    fn debug_name(&self) -> &'static str {
        "UndoableCmd"
    }
}

impl<T> fmt::Debug for dyn UndoableCmd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.debug_name())
            .field("description", &self.description())
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Commands that execute and undo as one history entry.
pub struct CommandBatch<T> {
    commands: Vec<Box<dyn UndoableCmd<T>>>,
    metadata: CommandMetadata,
    /// Number of leading commands currently applied.
    executed_to: usize,
}

impl<T> fmt::Debug for CommandBatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBatch")
            .field("commands_count", &self.commands.len())
            .field("metadata", &self.metadata)
            .field("executed_to", &self.executed_to)
            .finish()
    }
}

impl<T> CommandBatch<T> {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            metadata: CommandMetadata::new(description),
            executed_to: 0,
        }
    }

    #[must_use]
    pub fn with_batch_id(mut self, batch_id: u64) -> Self {
        self.metadata = self.metadata.with_batch(batch_id);
        self
    }

    pub fn push(&mut self, cmd: Box<dyn UndoableCmd<T>>) {
        self.commands.push(cmd);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<T> UndoableCmd<T> for CommandBatch<T> {
    fn execute(&mut self, target: &mut T) -> CommandResult {
        for i in 0..self.commands.len() {
            if let Err(e) = self.commands[i].execute(target) {
                for j in (0..i).rev() {
                    let _ = self.commands[j].undo(target);
                }
                self.executed_to = 0;
                return Err(e);
            }
            self.executed_to = i + 1;
        }
        Ok(())
    }

    fn undo(&mut self, target: &mut T) -> CommandResult {
        for i in (0..self.executed_to).rev() {
            self.commands[i].undo(target)?;
            self.executed_to = i;
        }
        Ok(())
    }

    fn size_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.metadata.size_bytes()
            + self.commands.iter().map(|c| c.size_bytes()).sum::<usize>()
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "CommandBatch"
    }
}

// ============================================================================
// Tie-point commands
// ============================================================================

/// Delete one pair (both sides) from the model.
#[derive(Debug, Clone)]
pub struct RemovePairCmd {
    index: PairIndex,
    removed: Option<TiePointPair>,
    metadata: CommandMetadata,
}

impl RemovePairCmd {
    #[must_use]
    pub fn new(index: PairIndex) -> Self {
        Self {
            index,
            removed: None,
            metadata: CommandMetadata::new("Delete Tie Point"),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: CommandMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Index the command currently refers to.
    #[must_use]
    pub fn index(&self) -> PairIndex {
        self.index
    }

    /// The pair captured by the last execute.
    #[must_use]
    pub fn removed(&self) -> Option<&TiePointPair> {
        self.removed.as_ref()
    }
}

impl UndoableCmd<TiePointModel> for RemovePairCmd {
    fn execute(&mut self, model: &mut TiePointModel) -> CommandResult {
        let pair = model
            .remove_pair(self.index)
            .ok_or(CommandError::PairNotFound(self.index))?;
        self.removed = Some(pair);
        Ok(())
    }

    fn undo(&mut self, model: &mut TiePointModel) -> CommandResult {
        let pair = self.removed.ok_or_else(|| {
            CommandError::InvalidState(format!("pair {} was never removed", self.index))
        })?;
        let used = model
            .insert_pair_direct(self.index, pair.fixed, pair.moving)
            .ok_or_else(|| CommandError::InvalidState(format!("pair {} is empty", self.index)))?;
        if used != self.index {
            tracing::warn!(
                target: "rigidlabel.history",
                original = self.index,
                restored = used,
                "original pair index taken, restored at next free index"
            );
            self.index = used;
        }
        Ok(())
    }

    fn size_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.metadata.description.len()
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "RemovePairCmd"
    }
}
