use super::ToolSuite;
use super::tools::Tool;
use crate::history::Action;
use crate::persistence::{self, KeyValueStore};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One auto-saved tool run. Query fields are stored inline next to the
/// id, as in `{"id": 1, "topic": "...", "timestamp": "...", "result": {}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSnapshot<Q, R> {
    pub id: u64,
    #[serde(flatten)]
    pub query: Q,
    pub timestamp: String,
    #[serde(alias = "strategy")]
    pub result: R,
}

pub type Saved<T> = SavedSnapshot<<T as Tool>::Query, <T as Tool>::Output>;

/// Inputs and the result currently on screen.
pub struct FormState<T: Tool> {
    pub form: T::Query,
    pub result: Option<T::Output>,
}

impl<T: Tool> Clone for FormState<T> {
    fn clone(&self) -> Self {
        Self {
            form: self.form.clone(),
            result: self.result.clone(),
        }
    }
}

/// Page state an action swaps in. Deletions only touch the list, so they
/// leave `form` empty and whatever is on screen stays put.
pub struct Checkpoint<T: Tool> {
    pub saved: Vec<Saved<T>>,
    pub form: Option<FormState<T>>,
}

/// The state of one tool: its form, the result on display, and its saved
/// runs, newest first.
pub struct ToolPage<T: Tool> {
    pub form: T::Query,
    pub displayed: Option<T::Output>,
    pub saved: Vec<Saved<T>>,
}

impl<T: Tool> Default for ToolPage<T> {
    fn default() -> Self {
        Self {
            form: T::Query::default(),
            displayed: None,
            saved: Vec::new(),
        }
    }
}

impl<T: Tool> ToolPage<T> {
    pub fn load(&mut self, store: &mut dyn KeyValueStore) {
        self.saved = persistence::load_or_reset(store, T::STORAGE_KEY);
        tracing::debug!(key = T::STORAGE_KEY, count = self.saved.len(), "loaded saved results");
    }

    pub fn find(&self, id: u64) -> Option<&Saved<T>> {
        self.saved.iter().find(|snapshot| snapshot.id == id)
    }

    /// Puts a saved run back on screen. Only changes what is displayed, so
    /// it is not recorded in history.
    pub fn view(&mut self, id: u64) -> bool {
        let Some(snapshot) = self.find(id).cloned() else {
            return false;
        };
        self.form = snapshot.query;
        self.displayed = Some(snapshot.result);
        true
    }

    fn form_state(&self) -> FormState<T> {
        FormState {
            form: self.form.clone(),
            result: self.displayed.clone(),
        }
    }

    pub fn prepare_commit(&self, snapshot: Saved<T>) -> PageChange<T> {
        let label = format!("save \"{}\"", T::summary(&snapshot.query));
        let after_form = FormState {
            form: snapshot.query.clone(),
            result: Some(snapshot.result.clone()),
        };
        let mut next = Vec::with_capacity(self.saved.len() + 1);
        next.push(snapshot);
        next.extend(self.saved.iter().cloned());

        PageChange {
            label,
            before: Checkpoint {
                saved: self.saved.clone(),
                form: Some(self.form_state()),
            },
            after: Checkpoint {
                saved: next,
                form: Some(after_form),
            },
        }
    }

    /// `None` when no saved run has this id.
    pub fn prepare_delete(&self, id: u64) -> Option<PageChange<T>> {
        let target = self.find(id)?;
        let label = format!("delete \"{}\"", T::summary(&target.query));
        let next: Vec<Saved<T>> = self
            .saved
            .iter()
            .filter(|snapshot| snapshot.id != id)
            .cloned()
            .collect();

        Some(PageChange {
            label,
            before: Checkpoint {
                saved: self.saved.clone(),
                form: None,
            },
            after: Checkpoint {
                saved: next,
                form: None,
            },
        })
    }

    pub fn restore(&mut self, checkpoint: &Checkpoint<T>) {
        self.saved = checkpoint.saved.clone();
        if let Some(state) = &checkpoint.form {
            self.form = state.form.clone();
            self.displayed = state.result.clone();
        }
    }
}

/// Swaps one tool page between two checkpoints, writing the list through to
/// storage before touching in-memory state.
pub struct PageChange<T: Tool> {
    label: String,
    before: Checkpoint<T>,
    after: Checkpoint<T>,
}

impl<T: Tool> PageChange<T> {
    fn apply(suite: &mut ToolSuite, checkpoint: &Checkpoint<T>) -> Result<()> {
        persistence::persist_list(suite.storage_mut(), T::STORAGE_KEY, &checkpoint.saved)?;
        T::page_mut(suite).restore(checkpoint);
        Ok(())
    }
}

impl<T: Tool> Action<ToolSuite> for PageChange<T> {
    fn undo(&self, suite: &mut ToolSuite) -> Result<()> {
        Self::apply(suite, &self.before)
    }

    fn redo(&self, suite: &mut ToolSuite) -> Result<()> {
        Self::apply(suite, &self.after)
    }

    fn label(&self) -> &str {
        &self.label
    }
}
