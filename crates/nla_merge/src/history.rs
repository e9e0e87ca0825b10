// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history built from serialized state snapshots.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Maximum undo history depth
const MAX_HISTORY: usize = 32;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Serialized copy of the undoable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Serialized state
    pub data: Vec<u8>,
    /// Timestamp when snapshot was taken
    pub timestamp: u64,
}

impl StateSnapshot {
    /// Create from serializable value
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            data: bincode::serialize(value)?,
            timestamp: now_secs(),
        })
    }

    /// Deserialize to value
    pub fn to_value<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// One entry on the undo or redo stack
#[derive(Debug, Clone)]
pub struct UndoStep {
    /// Human-readable description
    pub description: String,
    /// State to return to
    pub snapshot: StateSnapshot,
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<UndoStep>,
    redo_stack: Vec<UndoStep>,
    max_depth: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state before a new operation; clears the redo stack
    pub fn push(&mut self, description: impl Into<String>, snapshot: StateSnapshot) {
        self.redo_stack.clear();
        self.undo_stack.push_back(UndoStep {
            description: description.into(),
            snapshot,
        });

        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Take the last undo step; `current` becomes the matching redo step
    pub fn undo(&mut self, current: StateSnapshot) -> Result<UndoStep> {
        let step = self
            .undo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToUndo)?;
        self.redo_stack.push(UndoStep {
            description: step.description.clone(),
            snapshot: current,
        });
        Ok(step)
    }

    /// Take the last redo step; `current` becomes the matching undo step
    pub fn redo(&mut self, current: StateSnapshot) -> Result<UndoStep> {
        let step = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        self.undo_stack.push_back(UndoStep {
            description: step.description.clone(),
            snapshot: current,
        });
        Ok(step)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Total bytes held by both stacks
    pub fn memory_used(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(|s| s.snapshot.size())
            .sum()
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|s| s.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
