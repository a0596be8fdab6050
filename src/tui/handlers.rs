use crate::suite::export::ExportFormat;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn handle_normal_mode_key(key_event: KeyEvent) -> NormalModeAction {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Char('q') => NormalModeAction::Quit,
            KeyCode::Char('c') if ctrl => NormalModeAction::Quit,
            KeyCode::Char('r') if ctrl => NormalModeAction::Redo,
            KeyCode::Esc => NormalModeAction::ClearStatus,
            KeyCode::Tab => NormalModeAction::NextRoute,
            KeyCode::BackTab => NormalModeAction::PreviousRoute,
            KeyCode::Char(c @ '1'..='9') => NormalModeAction::JumpToRoute(c as usize - '1' as usize),
            KeyCode::Char('t') => NormalModeAction::SwitchTool,
            KeyCode::Char('f') | KeyCode::Right => NormalModeAction::NextField,
            KeyCode::Char('F') | KeyCode::Left => NormalModeAction::PreviousField,
            KeyCode::Char('e') | KeyCode::Char('i') => NormalModeAction::EditField,
            KeyCode::Char('g') | KeyCode::Enter => NormalModeAction::Generate,
            KeyCode::Up | KeyCode::Char('k') => NormalModeAction::MoveSelectionUp,
            KeyCode::Down | KeyCode::Char('j') => NormalModeAction::MoveSelectionDown,
            KeyCode::Char('v') => NormalModeAction::ViewSelected,
            KeyCode::Char('d') => NormalModeAction::DeleteSelected,
            KeyCode::Char('u') => NormalModeAction::Undo,
            KeyCode::Char('r') => NormalModeAction::Redo,
            KeyCode::Char('x') => NormalModeAction::Export(ExportFormat::Json),
            KeyCode::Char('X') => NormalModeAction::Export(ExportFormat::Csv),
            KeyCode::Char('?') => NormalModeAction::ToggleHelpMode,
            _ => NormalModeAction::None,
        }
    }

    pub fn handle_help_mode_key(key_event: KeyEvent) -> HelpModeAction {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => HelpModeAction::ExitHelpMode,
            _ => HelpModeAction::None,
        }
    }

    pub fn handle_edit_mode_key(key_event: KeyEvent) -> EditModeAction {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Esc => EditModeAction::CancelEdit,
            KeyCode::Enter => EditModeAction::ConfirmEdit,
            KeyCode::Backspace => EditModeAction::Backspace,
            KeyCode::Delete => EditModeAction::Delete,
            KeyCode::Left if ctrl => EditModeAction::MoveWordLeft,
            KeyCode::Right if ctrl => EditModeAction::MoveWordRight,
            KeyCode::Left => EditModeAction::MoveCursorLeft,
            KeyCode::Right => EditModeAction::MoveCursorRight,
            KeyCode::Home => EditModeAction::MoveCursorHome,
            KeyCode::End => EditModeAction::MoveCursorEnd,
            KeyCode::Char('w') if ctrl => EditModeAction::DeleteWordBackward,
            KeyCode::Char(c) => EditModeAction::InsertChar(c),
            _ => EditModeAction::None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NormalModeAction {
    None,
    Quit,
    ClearStatus,
    NextRoute,
    PreviousRoute,
    JumpToRoute(usize),
    SwitchTool,
    NextField,
    PreviousField,
    EditField,
    Generate,
    MoveSelectionUp,
    MoveSelectionDown,
    ViewSelected,
    DeleteSelected,
    Undo,
    Redo,
    Export(ExportFormat),
    ToggleHelpMode,
}

#[derive(Debug, PartialEq)]
pub enum HelpModeAction {
    None,
    ExitHelpMode,
}

#[derive(Debug, PartialEq)]
pub enum EditModeAction {
    None,
    CancelEdit,
    ConfirmEdit,
    Backspace,
    Delete,
    DeleteWordBackward,
    MoveCursorLeft,
    MoveCursorRight,
    MoveWordLeft,
    MoveWordRight,
    MoveCursorHome,
    MoveCursorEnd,
    InsertChar(char),
}

pub trait KeyEventHandler {
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn test_normal_mode_basic_keys() {
        let key_event = KeyEvent::from(KeyCode::Char('q'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::Quit);

        let key_event = KeyEvent::from(KeyCode::Esc);
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::ClearStatus);

        let key_event = KeyEvent::from(KeyCode::Enter);
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::Generate);

        let key_event = KeyEvent::from(KeyCode::Char('e'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::EditField);
    }

    #[test]
    fn test_route_keys() {
        let key_event = KeyEvent::from(KeyCode::Tab);
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::NextRoute);

        let key_event = KeyEvent::from(KeyCode::BackTab);
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::PreviousRoute);

        let key_event = KeyEvent::from(KeyCode::Char('1'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::JumpToRoute(0));

        let key_event = KeyEvent::from(KeyCode::Char('6'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::JumpToRoute(5));
    }

    #[test]
    fn test_history_keys() {
        let key_event = KeyEvent::from(KeyCode::Char('u'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::Undo);

        let key_event = KeyEvent::from(KeyCode::Char('r'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::Redo);

        assert_eq!(
            KeyHandler::handle_normal_mode_key(with_ctrl(KeyCode::Char('r'))),
            NormalModeAction::Redo
        );
    }

    #[test]
    fn test_saved_list_keys() {
        let key_event = KeyEvent::from(KeyCode::Char('j'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::MoveSelectionDown);

        let key_event = KeyEvent::from(KeyCode::Up);
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::MoveSelectionUp);

        let key_event = KeyEvent::from(KeyCode::Char('v'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::ViewSelected);

        let key_event = KeyEvent::from(KeyCode::Char('d'));
        assert_eq!(KeyHandler::handle_normal_mode_key(key_event), NormalModeAction::DeleteSelected);
    }

    #[test]
    fn test_export_keys() {
        let key_event = KeyEvent::from(KeyCode::Char('x'));
        assert_eq!(
            KeyHandler::handle_normal_mode_key(key_event),
            NormalModeAction::Export(ExportFormat::Json)
        );

        let key_event = KeyEvent::from(KeyCode::Char('X'));
        assert_eq!(
            KeyHandler::handle_normal_mode_key(key_event),
            NormalModeAction::Export(ExportFormat::Csv)
        );
    }

    #[test]
    fn test_normal_mode_ctrl_keys() {
        assert_eq!(
            KeyHandler::handle_normal_mode_key(with_ctrl(KeyCode::Char('c'))),
            NormalModeAction::Quit
        );
    }

    #[test]
    fn test_help_mode_keys() {
        let key_event = KeyEvent::from(KeyCode::Esc);
        assert_eq!(KeyHandler::handle_help_mode_key(key_event), HelpModeAction::ExitHelpMode);

        let key_event = KeyEvent::from(KeyCode::Char('?'));
        assert_eq!(KeyHandler::handle_help_mode_key(key_event), HelpModeAction::ExitHelpMode);

        let key_event = KeyEvent::from(KeyCode::Char('x'));
        assert_eq!(KeyHandler::handle_help_mode_key(key_event), HelpModeAction::None);
    }

    #[test]
    fn test_edit_mode_keys() {
        let key_event = KeyEvent::from(KeyCode::Esc);
        assert_eq!(KeyHandler::handle_edit_mode_key(key_event), EditModeAction::CancelEdit);

        let key_event = KeyEvent::from(KeyCode::Enter);
        assert_eq!(KeyHandler::handle_edit_mode_key(key_event), EditModeAction::ConfirmEdit);

        let key_event = KeyEvent::from(KeyCode::Left);
        assert_eq!(KeyHandler::handle_edit_mode_key(key_event), EditModeAction::MoveCursorLeft);

        assert_eq!(
            KeyHandler::handle_edit_mode_key(with_ctrl(KeyCode::Left)),
            EditModeAction::MoveWordLeft
        );
        assert_eq!(
            KeyHandler::handle_edit_mode_key(with_ctrl(KeyCode::Char('w'))),
            EditModeAction::DeleteWordBackward
        );

        // plain letters that are commands in normal mode are just text here
        let key_event = KeyEvent::from(KeyCode::Char('q'));
        assert_eq!(KeyHandler::handle_edit_mode_key(key_event), EditModeAction::InsertChar('q'));
    }
}
