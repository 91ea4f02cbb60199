// History
// Linear undo/redo stack of composed commands with selection snapshots

use log::debug;

use super::command::Command;
use super::error::EditResult;
use super::surface::{SurfaceId, Surfaces};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug)]
pub struct HistoryEntry {
    pub surface: SurfaceId,
    pub command: Command,
}

impl HistoryEntry {
    pub fn new(surface: SurfaceId, command: Command) -> Self {
        HistoryEntry { surface, command }
    }
}

#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    current_index: Option<usize>,
    limit: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// History keeping at most `limit` entries (at least one)
    pub fn with_limit(limit: usize) -> Self {
        History {
            entries: Vec::new(),
            current_index: None,
            limit: limit.max(1),
        }
    }

    /// Record an executed command.
    /// This discards any redo entries and keeps the stack within its limit.
    pub fn push(&mut self, surface: SurfaceId, command: Command) {
        // If we're in the middle of history, truncate everything after current position
        match self.current_index {
            Some(idx) => self.entries.truncate(idx + 1),
            None => self.entries.clear(),
        }

        self.entries.push(HistoryEntry::new(surface, command));

        // Limit history size
        if self.entries.len() > self.limit {
            self.entries.remove(0);
        }

        self.current_index = Some(self.entries.len() - 1);
    }

    pub fn can_undo(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn can_redo(&self) -> bool {
        let next = self.current_index.map_or(0, |idx| idx + 1);
        next < self.entries.len()
    }

    /// Invert the current command and restore the selection it started from.
    /// Returns the surface it touched, or None when there is nothing to undo.
    pub fn undo(&mut self, surfaces: &mut Surfaces) -> EditResult<Option<SurfaceId>> {
        let Some(idx) = self.current_index else {
            return Ok(None);
        };
        let entry = &mut self.entries[idx];
        let surface = surfaces.get_mut(entry.surface)?;
        entry.command.invert(surface)?;
        surface.restore_selection(entry.command.selection_before())?;
        debug!("undo {} ({:?})", idx, entry.command.kind());

        self.current_index = idx.checked_sub(1);
        Ok(Some(entry.surface))
    }

    /// Reapply the next command and restore the selection it ended with.
    /// Returns the surface it touched, or None when there is nothing to redo.
    pub fn redo(&mut self, surfaces: &mut Surfaces) -> EditResult<Option<SurfaceId>> {
        let next = self.current_index.map_or(0, |idx| idx + 1);
        let Some(entry) = self.entries.get_mut(next) else {
            return Ok(None);
        };
        let surface = surfaces.get_mut(entry.surface)?;
        entry.command.reapply(surface)?;
        surface.restore_selection(entry.command.selection_after())?;
        debug!("redo {} ({:?})", next, entry.command.kind());

        self.current_index = Some(next);
        Ok(Some(entry.surface))
    }

    /// Most recently executed entry
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current_index.and_then(|idx| self.entries.get(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
