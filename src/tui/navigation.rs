/// Cursor over the saved-results list of the active tool.
pub struct NavigationState {
    pub selected_index: usize,
    pub scroll_offset: usize,
}

const VISIBLE_ITEMS: usize = 12;

impl NavigationState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            scroll_offset: 0,
        }
    }

    pub fn reset(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.update_scroll();
        }
    }

    pub fn move_selection_down(&mut self, max_items: usize) {
        if self.selected_index < max_items.saturating_sub(1) {
            self.selected_index += 1;
            self.update_scroll();
        }
    }

    /// Pulls the cursor back inside a list that shrank underneath it.
    pub fn clamp(&mut self, max_items: usize) {
        if self.selected_index >= max_items {
            self.selected_index = max_items.saturating_sub(1);
        }
        self.update_scroll();
    }

    pub fn update_scroll(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + VISIBLE_ITEMS {
            self.scroll_offset = self.selected_index.saturating_sub(VISIBLE_ITEMS - 1);
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}
