//! Undo/redo history of command-sequence snapshots
//!
//! Linear history: committing after an undo discards the redo branch.

use tracing::trace;

use crate::command::Command;

/// Frozen copy of a command sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryEntry {
    commands: Vec<Command>,
}

impl HistoryEntry {
    pub fn new(commands: &[Command]) -> Self {
        Self {
            commands: commands.to_vec(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

/// Snapshots plus a cursor at the displayed one; `None` while empty
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `commands` as the new current state.
    ///
    /// Entries after the cursor are dropped first.
    pub fn commit(&mut self, commands: &[Command]) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            trace!(discarded = self.entries.len() - keep, "Dropping redo branch");
            self.entries.truncate(keep);
        }
        self.entries.push(HistoryEntry::new(commands));
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry; `None` at the first entry or when empty
    pub fn undo(&mut self) -> Option<&[Command]> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.entries.get(c - 1).map(HistoryEntry::commands)
            }
            _ => None,
        }
    }

    /// Step forward one entry; `None` at the last entry or when empty
    pub fn redo(&mut self) -> Option<&[Command]> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if self.cursor.is_none() || next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        self.entries.get(next).map(HistoryEntry::commands)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> Option<&[Command]> {
        self.cursor
            .and_then(|c| self.entries.get(c))
            .map(HistoryEntry::commands)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
