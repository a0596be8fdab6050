use anyhow::Result;
use std::collections::VecDeque;

/// A reversible change. Both directions must only depend on state captured
/// when the action was built, never on whatever `ctx` holds at replay time.
pub trait Action<C> {
    fn undo(&self, ctx: &mut C) -> Result<()>;
    fn redo(&self, ctx: &mut C) -> Result<()>;

    fn label(&self) -> &str {
        "change"
    }
}

/// Linear undo/redo history over actions that mutate a `C`.
pub struct HistoryManager<C> {
    undo_stack: Vec<Box<dyn Action<C>>>,
    // Front is the next action to redo.
    redo_stack: VecDeque<Box<dyn Action<C>>>,
}

impl<C> HistoryManager<C> {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: VecDeque::new(),
        }
    }

    pub fn push_action(&mut self, action: Box<dyn Action<C>>) {
        tracing::debug!(label = action.label(), "push action");
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Applies `action` through its redo path and records it. Nothing is
    /// recorded when the redo fails.
    pub fn perform(&mut self, action: Box<dyn Action<C>>, ctx: &mut C) -> Result<()> {
        action.redo(ctx)?;
        self.push_action(action);
        Ok(())
    }

    pub fn undo(&mut self, ctx: &mut C) -> Result<()> {
        let Some(action) = self.undo_stack.pop() else {
            return Ok(());
        };
        if let Err(e) = action.undo(ctx) {
            self.undo_stack.push(action);
            return Err(e);
        }
        tracing::debug!(label = action.label(), "undo");
        self.redo_stack.push_front(action);
        Ok(())
    }

    pub fn redo(&mut self, ctx: &mut C) -> Result<()> {
        let Some(action) = self.redo_stack.pop_front() else {
            return Ok(());
        };
        if let Err(e) = action.redo(ctx) {
            self.redo_stack.push_front(action);
            return Err(e);
        }
        tracing::debug!(label = action.label(), "redo");
        self.undo_stack.push(action);
        Ok(())
    }

    /// Drops every recorded action without running any of them.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|action| action.label())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.front().map(|action| action.label())
    }
}

impl<C> Default for HistoryManager<C> {
    fn default() -> Self {
        Self::new()
    }
}
