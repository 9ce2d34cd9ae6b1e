#![forbid(unsafe_code)]

//! History stack for row-level undo/redo.
//!
//! [`HistoryManager`] keeps dual stacks of executed commands:
//!
//! - **Depth limit**: oldest commands evicted past `max_depth`
//! - **Memory limit**: oldest commands evicted past `max_bytes` (0 = off)
//! - **Branching**: a new command clears the redo stack
//!
//! # Invariants
//!
//! 1. `total_bytes` always equals the sum of `size_bytes()` over both stacks
//! 2. `undo_stack.len() <= config.max_depth` after any operation
//! 3. The redo stack is empty right after a push
//! 4. A command whose undo or redo fails stays on the stack it came from
//!
//! ```text
//! push(c3)          undo: [c1, c2, c3]   redo: []
//! undo() x2         undo: [c1]           redo: [c3, c2]
//! push(c4)          undo: [c1, c4]       redo: []
//! ```

use std::collections::VecDeque;
use std::fmt;

use super::command::{CommandError, UndoableCmd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of commands kept for undo.
    pub max_depth: usize,
    /// Maximum total bytes for both stacks (0 = unlimited).
    pub max_bytes: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            max_bytes: 0,
        }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn new(max_depth: usize, max_bytes: usize) -> Self {
        Self {
            max_depth,
            max_bytes,
        }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_bytes: 0,
        }
    }
}

/// Undo/redo stacks of commands over a target `T`.
pub struct HistoryManager<T> {
    undo_stack: VecDeque<Box<dyn UndoableCmd<T>>>,
    redo_stack: VecDeque<Box<dyn UndoableCmd<T>>>,
    config: HistoryConfig,
    total_bytes: usize,
}

impl<T> fmt::Debug for HistoryManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("total_bytes", &self.total_bytes)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<T> HistoryManager<T> {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
            total_bytes: 0,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Push an already executed command. Clears the redo stack.
    pub fn push(&mut self, cmd: Box<dyn UndoableCmd<T>>) {
        self.clear_redo();
        self.total_bytes += cmd.size_bytes();
        tracing::debug!(
            target: "rigidlabel.history",
            description = cmd.description(),
            depth = self.undo_stack.len() + 1,
            "command pushed"
        );
        self.undo_stack.push_back(cmd);
        self.enforce_limits();
    }

    /// Execute `cmd` against `target` and push it on success.
    ///
    /// A command that fails to execute is dropped and history is unchanged.
    pub fn execute(
        &mut self,
        mut cmd: Box<dyn UndoableCmd<T>>,
        target: &mut T,
    ) -> Result<(), CommandError> {
        cmd.execute(target)?;
        self.push(cmd);
        Ok(())
    }

    /// Undo the newest command.
    ///
    /// - `Some(Ok(description))` if undo succeeded
    /// - `Some(Err(error))` if it failed (command stays on the undo stack)
    /// - `None` if there is nothing to undo
    pub fn undo(&mut self, target: &mut T) -> Option<Result<String, CommandError>> {
        let mut cmd = self.undo_stack.pop_back()?;
        let description = cmd.description().to_string();
        let before = cmd.size_bytes();

        let result = cmd.undo(target);
        self.total_bytes = self.total_bytes.saturating_sub(before) + cmd.size_bytes();
        match result {
            Ok(()) => {
                self.redo_stack.push_back(cmd);
                Some(Ok(description))
            }
            Err(e) => {
                self.undo_stack.push_back(cmd);
                Some(Err(e))
            }
        }
    }

    /// Redo the newest undone command. Same return contract as [`undo`](Self::undo).
    pub fn redo(&mut self, target: &mut T) -> Option<Result<String, CommandError>> {
        let mut cmd = self.redo_stack.pop_back()?;
        let description = cmd.description().to_string();
        let before = cmd.size_bytes();

        let result = cmd.redo(target);
        self.total_bytes = self.total_bytes.saturating_sub(before) + cmd.size_bytes();
        match result {
            Ok(()) => {
                self.undo_stack.push_back(cmd);
                Some(Ok(description))
            }
            Err(e) => {
                self.redo_stack.push_back(cmd);
                Some(Err(e))
            }
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ========================================================================
    // Info
    // ========================================================================

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Descriptions of undoable commands, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(|c| c.description())
            .collect()
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description())
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|c| c.description())
    }

    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.total_bytes
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.total_bytes = 0;
    }

    fn clear_redo(&mut self) {
        for cmd in self.redo_stack.drain(..) {
            self.total_bytes = self.total_bytes.saturating_sub(cmd.size_bytes());
        }
    }

    fn enforce_limits(&mut self) {
        while self.undo_stack.len() > self.config.max_depth {
            if let Some(cmd) = self.undo_stack.pop_front() {
                self.total_bytes = self.total_bytes.saturating_sub(cmd.size_bytes());
            }
        }

        if self.config.max_bytes > 0 {
            while self.total_bytes > self.config.max_bytes {
                if let Some(cmd) = self.redo_stack.pop_front() {
                    self.total_bytes = self.total_bytes.saturating_sub(cmd.size_bytes());
                    continue;
                }
                if let Some(cmd) = self.undo_stack.pop_front() {
                    self.total_bytes = self.total_bytes.saturating_sub(cmd.size_bytes());
                } else {
                    break;
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
