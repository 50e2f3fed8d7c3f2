/// Highlight and scroll position of a row list
pub struct TableState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 10,
        }
    }
}

impl TableState {
    /// Highlight the first row of a fresh row set, or nothing if it is empty
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_stops_at_last_row_and_scrolls() {
        let mut table = TableState {
            visible_rows: 3,
            ..TableState::default()
        };
        for _ in 0..10 {
            table.select_next(5);
        }
        assert_eq!(table.selected, Some(4));
        assert_eq!(table.scroll_offset, 2);

        for _ in 0..10 {
            table.select_prev();
        }
        assert_eq!(table.selected, Some(0));
        assert_eq!(table.scroll_offset, 0);
    }

    #[test]
    fn reset_on_empty_clears_highlight() {
        let mut table = TableState::default();
        table.select_next(3);
        table.reset(0);
        assert_eq!(table.selected, None);
        table.select_next(0);
        assert_eq!(table.selected, None);
    }
}
