//! Single-line text input used by the free-text screens.

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    max_len: usize,
}

impl TextField {
    pub fn new(max_len: usize) -> Self {
        Self {
            value: String::new(),
            max_len,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Applies an editing key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                if self.value.chars().count() < self.max_len && !c.is_control() {
                    self.value.push(c);
                }
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    /// Value with a trailing cursor.
    pub fn display(&self) -> String {
        format!("{}_", self.value)
    }
}
