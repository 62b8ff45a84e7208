//! Undo/redo history of whole-state snapshots.

/// Default number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo/redo stacks.
///
/// Callers [`record`](History::record) the state as it was *before* a
/// mutation. Inside a batch only the first record counts, so a gesture
/// made of many mutations undoes in one step.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: Vec<T>,
    redo_stack: Vec<T>,
    limit: usize,
    batch_depth: usize,
    batch_recorded: bool,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> History<T> {
    /// Create a history keeping at most `limit` undo states.
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            batch_depth: 0,
            batch_recorded: false,
        }
    }

    /// Push the pre-mutation state. Clears the redo stack.
    pub fn record(&mut self, before: T) {
        if self.batch_depth > 0 {
            if self.batch_recorded {
                return;
            }
            self.batch_recorded = true;
        }

        self.undo_stack.push(before);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. `current` goes onto the redo stack and the state to
    /// restore is returned.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Open a batch. Batches nest; only the outermost one matters.
    pub fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_recorded = false;
        }
        self.batch_depth += 1;
    }

    /// Close a batch. Returns true when the outermost batch closed.
    pub fn end_batch(&mut self) -> bool {
        if self.batch_depth == 0 {
            log::warn!("end_batch called without a matching begin_batch");
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.batch_recorded = false;
            true
        } else {
            false
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
