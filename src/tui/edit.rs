/// Single-line input buffer for the field being edited. The cursor is a
/// byte offset that always sits on a char boundary.
pub struct EditState {
    pub edit_mode: bool,
    pub edit_buffer: String,
    pub edit_cursor_position: usize,
}

impl EditState {
    pub fn new() -> Self {
        Self {
            edit_mode: false,
            edit_buffer: String::new(),
            edit_cursor_position: 0,
        }
    }

    pub fn enter_edit_mode(&mut self, content: String) {
        self.edit_buffer = content;
        self.edit_cursor_position = self.edit_buffer.len();
        self.edit_mode = true;
    }

    /// Leaves edit mode and hands back what was typed.
    pub fn take_buffer(&mut self) -> String {
        let content = std::mem::take(&mut self.edit_buffer);
        self.exit_edit_mode();
        content
    }

    pub fn exit_edit_mode(&mut self) {
        self.edit_mode = false;
        self.edit_buffer.clear();
        self.edit_cursor_position = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit_buffer.insert(self.edit_cursor_position, c);
        self.edit_cursor_position += c.len_utf8();
    }

    fn previous_boundary(&self) -> usize {
        self.edit_buffer[..self.edit_cursor_position]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.edit_buffer[self.edit_cursor_position..]
            .chars()
            .next()
            .map(|c| self.edit_cursor_position + c.len_utf8())
            .unwrap_or(self.edit_buffer.len())
    }

    pub fn backspace(&mut self) {
        if self.edit_cursor_position > 0 {
            let start = self.previous_boundary();
            self.edit_buffer.replace_range(start..self.edit_cursor_position, "");
            self.edit_cursor_position = start;
        }
    }

    pub fn delete(&mut self) {
        if self.edit_cursor_position < self.edit_buffer.len() {
            self.edit_buffer.remove(self.edit_cursor_position);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.edit_cursor_position = self.previous_boundary();
    }

    pub fn move_cursor_right(&mut self) {
        self.edit_cursor_position = self.next_boundary();
    }

    pub fn move_cursor_home(&mut self) {
        self.edit_cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.edit_cursor_position = self.edit_buffer.len();
    }

    // Start of the word left of the cursor, skipping whitespace first.
    fn word_start(&self) -> usize {
        let before = &self.edit_buffer[..self.edit_cursor_position];
        let trimmed = before.trim_end();
        trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0)
    }

    pub fn delete_word_backward(&mut self) {
        let start = self.word_start();
        self.edit_buffer.replace_range(start..self.edit_cursor_position, "");
        self.edit_cursor_position = start;
    }

    pub fn move_to_previous_word(&mut self) {
        self.edit_cursor_position = self.word_start();
    }

    pub fn move_to_next_word(&mut self) {
        let rest = &self.edit_buffer[self.edit_cursor_position..];
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let gap = rest[word_end..]
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len() - word_end);
        self.edit_cursor_position += word_end + gap;
    }
}

impl Default for EditState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_state_new() {
        let edit_state = EditState::new();
        assert!(!edit_state.edit_mode);
        assert!(edit_state.edit_buffer.is_empty());
        assert_eq!(edit_state.edit_cursor_position, 0);
    }

    #[test]
    fn test_enter_edit_mode() {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode("vegan baking".to_string());

        assert!(edit_state.edit_mode);
        assert_eq!(edit_state.edit_buffer, "vegan baking");
        assert_eq!(edit_state.edit_cursor_position, "vegan baking".len());
    }

    #[test]
    fn test_take_buffer_exits_edit_mode() {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode("example.com".to_string());

        assert_eq!(edit_state.take_buffer(), "example.com");
        assert!(!edit_state.edit_mode);
        assert!(edit_state.edit_buffer.is_empty());
        assert_eq!(edit_state.edit_cursor_position, 0);
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode("seo".to_string());
        edit_state.insert_char('!');
        assert_eq!(edit_state.edit_buffer, "seo!");

        edit_state.backspace();
        edit_state.backspace();
        assert_eq!(edit_state.edit_buffer, "se");
        assert_eq!(edit_state.edit_cursor_position, 2);
    }

    #[test]
    fn test_multibyte_cursor_movement() {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode("café".to_string());

        edit_state.move_cursor_left();
        assert_eq!(edit_state.edit_cursor_position, 3);
        edit_state.move_cursor_right();
        assert_eq!(edit_state.edit_cursor_position, 5);

        edit_state.backspace();
        assert_eq!(edit_state.edit_buffer, "caf");
    }

    #[test]
    fn test_delete_at_start() {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode("Hello".to_string());
        edit_state.move_cursor_home();
        edit_state.delete();

        assert_eq!(edit_state.edit_buffer, "ello");
        assert_eq!(edit_state.edit_cursor_position, 0);

        edit_state.move_cursor_end();
        edit_state.delete();
        assert_eq!(edit_state.edit_buffer, "ello");
    }

    #[test]
    fn test_delete_word_backward() {
        let mut edit_state = EditState::new();

        edit_state.enter_edit_mode("best running shoes".to_string());
        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "best running ");
        assert_eq!(edit_state.edit_cursor_position, 13);

        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "best ");

        edit_state.enter_edit_mode("foo bar baz".to_string());
        edit_state.edit_cursor_position = 7;
        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "foo  baz");
        assert_eq!(edit_state.edit_cursor_position, 4);

        edit_state.enter_edit_mode("test".to_string());
        edit_state.edit_cursor_position = 0;
        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "test");
    }

    #[test]
    fn test_word_movement() {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode("hello world test".to_string());

        edit_state.move_to_previous_word();
        assert_eq!(edit_state.edit_cursor_position, 12);
        edit_state.move_to_previous_word();
        assert_eq!(edit_state.edit_cursor_position, 6);
        edit_state.move_to_previous_word();
        edit_state.move_to_previous_word();
        assert_eq!(edit_state.edit_cursor_position, 0);

        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 6);
        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 12);
        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 16);
        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 16);
    }
}
