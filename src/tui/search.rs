use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// What a key did to a text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    /// The text changed
    Edited,
    /// Only the cursor moved
    Moved,
    /// Not an editing key
    Ignored,
}

/// Single-line text input with a byte-offset cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor_pos: usize,
}

impl TextInput {
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_pos = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Display columns before the cursor, for placing the terminal cursor
    pub fn cursor_column(&self) -> u16 {
        self.value[..self.cursor_pos].width() as u16
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor_pos..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor_pos + i)
            .unwrap_or(self.value.len())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputChange {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
                InputChange::Edited
            }
            KeyCode::Backspace => {
                if self.cursor_pos == 0 {
                    return InputChange::Ignored;
                }
                let prev = self.prev_boundary();
                self.value.remove(prev);
                self.cursor_pos = prev;
                InputChange::Edited
            }
            KeyCode::Delete => {
                if self.cursor_pos >= self.value.len() {
                    return InputChange::Ignored;
                }
                self.value.remove(self.cursor_pos);
                InputChange::Edited
            }
            KeyCode::Left => {
                self.cursor_pos = self.prev_boundary();
                InputChange::Moved
            }
            KeyCode::Right => {
                self.cursor_pos = self.next_boundary();
                InputChange::Moved
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                InputChange::Moved
            }
            KeyCode::End => {
                self.cursor_pos = self.value.len();
                InputChange::Moved
            }
            _ => InputChange::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::default();
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input
    }

    #[test]
    fn typing_and_backspace_respect_char_boundaries() {
        let mut input = typed("José");
        assert_eq!(input.cursor_pos, "José".len());

        assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputChange::Edited);
        assert_eq!(input.value, "Jos");
        assert_eq!(input.cursor_column(), 3);
    }

    #[test]
    fn editing_in_the_middle() {
        let mut input = typed("jhn");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Char('o')));
        assert_eq!(input.value, "john");

        input.handle_key(key(KeyCode::End));
        assert_eq!(input.handle_key(key(KeyCode::Delete)), InputChange::Ignored);
    }

    #[test]
    fn control_chords_are_not_text() {
        let mut input = TextInput::default();
        let change = input.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(change, InputChange::Ignored);
        assert!(input.is_empty());
    }
}
