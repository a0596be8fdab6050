use crate::suite::backend::{BackendError, SeoBackend};
use crate::suite::export::{self, CsvExport, ExportFormat};
use crate::suite::route::{Route, ToolKind};
use crate::suite::tools::Tool;
use crate::suite::{History, ToolSuite, with_tool};
use crate::tui::edit::EditState;
use crate::tui::handlers::{
    EditModeAction, HelpModeAction, KeyEventHandler, KeyHandler, NormalModeAction,
};
use crate::tui::navigation::NavigationState;
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Identifies one backend request. A completion is only applied while its
/// ticket is still the pending one on the mounted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub route: Route,
    pub sequence: u64,
}

type Finish = Box<dyn FnOnce(&mut App) + Send>;

pub struct Completion {
    ticket: Ticket,
    finish: Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

/// What the UI needs from the active tool, flattened out of its generic types.
pub struct PageView {
    pub title: &'static str,
    pub fields: Vec<(&'static str, String)>,
    pub result: Vec<String>,
    pub saved: Vec<SavedRow>,
}

pub struct SavedRow {
    pub id: u64,
    pub summary: String,
    pub saved_at: String,
}

pub struct App {
    pub suite: ToolSuite,
    pub history: History,
    pub route: Route,
    pub tool_index: usize,
    pub field_index: usize,
    pub edit: EditState,
    pub nav: NavigationState,
    pub help_mode: bool,
    pub should_quit: bool,
    pub status: Option<Status>,
    pending: Option<Ticket>,
    next_sequence: u64,
    backend: Arc<dyn SeoBackend>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(suite: ToolSuite, backend: Arc<dyn SeoBackend>, export_dir: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            suite,
            history: History::new(),
            route: Route::ALL[0],
            tool_index: 0,
            field_index: 0,
            edit: EditState::new(),
            nav: NavigationState::new(),
            help_mode: false,
            should_quit: false,
            status: None,
            pending: None,
            next_sequence: 0,
            backend,
            sender,
            receiver,
            export_dir,
        }
    }

    pub fn active_tool(&self) -> ToolKind {
        let tools = self.route.tools();
        tools[self.tool_index.min(tools.len() - 1)]
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    /// Leaving a route unmounts its pages: history is dropped without
    /// running anything and any in-flight request is orphaned.
    pub fn set_route(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        tracing::debug!(from = self.route.key(), to = route.key(), "route change");
        self.route = route;
        self.tool_index = 0;
        self.field_index = 0;
        self.edit.exit_edit_mode();
        self.nav.reset();
        self.pending = None;
        self.status = None;
        self.history.clear_history();
    }

    fn switch_tool(&mut self) {
        let count = self.route.tools().len();
        if count > 1 {
            self.tool_index = (self.tool_index + 1) % count;
            self.field_index = 0;
            self.nav.reset();
        }
    }

    fn field_count(&self) -> usize {
        with_tool!(self.active_tool(), T => T::FIELDS.len())
    }

    fn saved_count(&self) -> usize {
        with_tool!(self.active_tool(), T => T::page(&self.suite).saved.len())
    }

    fn selected_id(&self) -> Option<u64> {
        let index = self.nav.selected_index;
        with_tool!(self.active_tool(), T => T::page(&self.suite).saved.get(index).map(|s| s.id))
    }

    pub fn page_view(&self) -> PageView {
        with_tool!(self.active_tool(), T => self.view_of::<T>())
    }

    fn view_of<T: Tool>(&self) -> PageView {
        let page = T::page(&self.suite);
        let fields = T::FIELDS
            .iter()
            .enumerate()
            .map(|(i, label)| (*label, T::field(&page.form, i).unwrap_or_default().to_string()))
            .collect();
        let result = page.displayed.as_ref().map(T::describe).unwrap_or_default();
        let saved = page
            .saved
            .iter()
            .map(|snapshot| SavedRow {
                id: snapshot.id,
                summary: T::summary(&snapshot.query),
                saved_at: local_time(&snapshot.timestamp),
            })
            .collect();
        PageView {
            title: T::TITLE,
            fields,
            result,
            saved,
        }
    }

    // ------------------------------------------------------------ editing

    fn enter_edit_mode(&mut self) {
        let index = self.field_index;
        let current = with_tool!(self.active_tool(), T => {
            T::field(&T::page(&self.suite).form, index).unwrap_or_default().to_string()
        });
        self.edit.enter_edit_mode(current);
    }

    fn confirm_edit(&mut self) {
        let index = self.field_index;
        let value = self.edit.take_buffer();
        with_tool!(self.active_tool(), T => {
            if let Some(field) = T::field_mut(&mut T::page_mut(&mut self.suite).form, index) {
                *field = value;
            }
        });
    }

    // ----------------------------------------------------------- requests

    pub fn generate(&mut self) {
        with_tool!(self.active_tool(), T => self.start_request::<T>())
    }

    fn start_request<T: Tool>(&mut self) {
        if self.pending.is_some() {
            self.set_error("A request is already running.");
            return;
        }
        let query = T::page(&self.suite).form.clone();
        if let Err(e) = T::validate(&query) {
            self.set_error(e.to_string());
            return;
        }

        let ticket = Ticket {
            route: self.route,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.pending = Some(ticket);
        self.set_info(format!("Running {}...", T::TITLE));
        tracing::info!(tool = T::TITLE, sequence = ticket.sequence, "request started");

        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let outcome = T::request(backend.as_ref(), &query);
            let finish: Finish = Box::new(move |app: &mut App| app.finish_request::<T>(query, outcome));
            // the receiver is gone once the app has quit
            let _ = sender.send(Completion { ticket, finish });
        });
    }

    fn finish_request<T: Tool>(&mut self, query: T::Query, outcome: Result<T::Output, BackendError>) {
        match outcome {
            Ok(result) => match self.suite.commit::<T>(&mut self.history, query, result) {
                Ok(_) => {
                    self.nav.reset();
                    self.set_info(format!("{} saved.", T::TITLE));
                }
                Err(e) => {
                    tracing::error!(tool = T::TITLE, error = %format!("{:#}", e), "failed to save result");
                    self.set_error(format!("Could not save result: {}", e));
                }
            },
            Err(e) => {
                tracing::error!(tool = T::TITLE, error = %e, "request failed");
                self.set_error(T::failure_message(&e));
            }
        }
    }

    /// Applies every completion that has arrived, dropping stale ones.
    pub fn drain_completions(&mut self) {
        while let Ok(completion) = self.receiver.try_recv() {
            self.accept(completion);
        }
    }

    fn accept(&mut self, completion: Completion) {
        if self.pending != Some(completion.ticket) || completion.ticket.route != self.route {
            tracing::debug!(
                route = completion.ticket.route.key(),
                sequence = completion.ticket.sequence,
                "discarding completion for unmounted page"
            );
            return;
        }
        self.pending = None;
        (completion.finish)(self);
    }

    // -------------------------------------------------------- saved items

    fn view_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        with_tool!(self.active_tool(), T => {
            self.suite.view::<T>(id);
        });
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let outcome = with_tool!(self.active_tool(), T => self.suite.delete::<T>(&mut self.history, id));
        match outcome {
            Ok(_) => {
                let count = self.saved_count();
                self.nav.clamp(count);
            }
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "delete failed");
                self.set_error(format!("Could not delete: {}", e));
            }
        }
    }

    pub fn undo(&mut self) {
        if let Err(e) = self.history.undo(&mut self.suite) {
            tracing::error!(error = %format!("{:#}", e), "undo failed");
            self.set_error(format!("Undo failed: {}", e));
        }
        let count = self.saved_count();
        self.nav.clamp(count);
    }

    pub fn redo(&mut self) {
        if let Err(e) = self.history.redo(&mut self.suite) {
            tracing::error!(error = %format!("{:#}", e), "redo failed");
            self.set_error(format!("Redo failed: {}", e));
        }
        let count = self.saved_count();
        self.nav.clamp(count);
    }

    fn export(&mut self, format: ExportFormat) {
        let outcome = with_tool!(self.active_tool(), T => self.export_displayed::<T>(format));
        match outcome {
            Ok(Some(path)) => self.set_info(format!("Exported to {}", path.display())),
            Ok(None) => self.set_error("Nothing to export yet."),
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "export failed");
                self.set_error(format!("Export failed: {}", e));
            }
        }
    }

    fn export_displayed<T: CsvExport>(&self, format: ExportFormat) -> Result<Option<PathBuf>> {
        let page = T::page(&self.suite);
        let Some(result) = &page.displayed else {
            return Ok(None);
        };
        std::fs::create_dir_all(&self.export_dir)?;
        export::write_export::<T>(&page.form, result, format, &self.export_dir, None).map(Some)
    }

    // -------------------------------------------------------------- keys

    fn handle_normal_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_normal_mode_key(key_event) {
            NormalModeAction::Quit => self.should_quit = true,
            NormalModeAction::ClearStatus => self.status = None,
            NormalModeAction::NextRoute => self.set_route(self.route.next()),
            NormalModeAction::PreviousRoute => self.set_route(self.route.previous()),
            NormalModeAction::JumpToRoute(index) => {
                if let Some(route) = Route::ALL.get(index) {
                    self.set_route(*route);
                }
            }
            NormalModeAction::SwitchTool => self.switch_tool(),
            NormalModeAction::NextField => {
                self.field_index = (self.field_index + 1) % self.field_count();
            }
            NormalModeAction::PreviousField => {
                let count = self.field_count();
                self.field_index = (self.field_index + count - 1) % count;
            }
            NormalModeAction::EditField => self.enter_edit_mode(),
            NormalModeAction::Generate => self.generate(),
            NormalModeAction::MoveSelectionUp => self.nav.move_selection_up(),
            NormalModeAction::MoveSelectionDown => {
                let count = self.saved_count();
                self.nav.move_selection_down(count);
            }
            NormalModeAction::ViewSelected => self.view_selected(),
            NormalModeAction::DeleteSelected => self.delete_selected(),
            NormalModeAction::Undo => self.undo(),
            NormalModeAction::Redo => self.redo(),
            NormalModeAction::Export(format) => self.export(format),
            NormalModeAction::ToggleHelpMode => self.help_mode = true,
            NormalModeAction::None => {}
        }
    }

    fn handle_edit_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_edit_mode_key(key_event) {
            EditModeAction::CancelEdit => self.edit.exit_edit_mode(),
            EditModeAction::ConfirmEdit => self.confirm_edit(),
            EditModeAction::Backspace => self.edit.backspace(),
            EditModeAction::Delete => self.edit.delete(),
            EditModeAction::DeleteWordBackward => self.edit.delete_word_backward(),
            EditModeAction::MoveCursorLeft => self.edit.move_cursor_left(),
            EditModeAction::MoveCursorRight => self.edit.move_cursor_right(),
            EditModeAction::MoveWordLeft => self.edit.move_to_previous_word(),
            EditModeAction::MoveWordRight => self.edit.move_to_next_word(),
            EditModeAction::MoveCursorHome => self.edit.move_cursor_home(),
            EditModeAction::MoveCursorEnd => self.edit.move_cursor_end(),
            EditModeAction::InsertChar(c) => self.edit.insert_char(c),
            EditModeAction::None => {}
        }
    }
}

impl KeyEventHandler for App {
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if self.help_mode {
            if KeyHandler::handle_help_mode_key(key_event) == HelpModeAction::ExitHelpMode {
                self.help_mode = false;
            }
        } else if self.edit.edit_mode {
            self.handle_edit_mode_key(key_event);
        } else {
            self.handle_normal_mode_key(key_event);
        }
        Ok(())
    }
}

fn local_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
