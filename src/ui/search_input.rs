//! Single-line search field.
//!
//! Editing works on grapheme clusters so the cursor never lands inside a
//! combined character.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::style::Styles;

/// Longest term accepted, in graphemes.
pub const CHAR_LIMIT: usize = 40;

/// Single-line search field.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    graphemes: Vec<String>,
    pos: usize,
    focused: bool,
    /// Shown while the field is empty.
    pub placeholder: String,
    /// Shown before the text.
    pub prompt: String,
}

impl SearchInput {
    /// An empty, unfocused field.
    #[must_use]
    pub fn new() -> Self {
        Self {
            placeholder: "Search by name…".to_string(),
            prompt: "/ ".to_string(),
            ..Self::default()
        }
    }

    /// Current text.
    #[must_use]
    pub fn value(&self) -> String {
        self.graphemes.concat()
    }

    /// Replaces the text and moves the cursor to its end.
    pub fn set_value(&mut self, value: &str) {
        self.graphemes = value
            .graphemes(true)
            .take(CHAR_LIMIT)
            .map(str::to_string)
            .collect();
        self.pos = self.graphemes.len();
    }

    /// Cursor position in graphemes.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Starts taking key input.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Stops taking key input.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether the field takes key input.
    #[must_use]
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Applies an editing key. Returns `true` when the value changed.
    pub fn handle_key(&mut self, msg: &KeyMsg) -> bool {
        let ctrl = msg.modifiers.contains(KeyModifiers::CONTROL);
        let before = self.graphemes.len();
        match msg.key {
            KeyCode::Char('a') if ctrl => self.pos = 0,
            KeyCode::Char('e') if ctrl => self.pos = self.graphemes.len(),
            KeyCode::Char('u') if ctrl => {
                self.graphemes.drain(..self.pos);
                self.pos = 0;
                return before != self.graphemes.len();
            }
            KeyCode::Char('k') if ctrl => {
                self.graphemes.truncate(self.pos);
                return before != self.graphemes.len();
            }
            KeyCode::Char('w') if ctrl => return self.delete_word_backward(),
            KeyCode::Char(c) if !ctrl => {
                if self.graphemes.len() >= CHAR_LIMIT {
                    return false;
                }
                self.graphemes.insert(self.pos, c.to_string());
                self.pos += 1;
                return true;
            }
            KeyCode::Backspace => {
                if self.pos == 0 {
                    return false;
                }
                self.pos -= 1;
                self.graphemes.remove(self.pos);
                return true;
            }
            KeyCode::Delete => {
                if self.pos >= self.graphemes.len() {
                    return false;
                }
                self.graphemes.remove(self.pos);
                return true;
            }
            KeyCode::Left => self.pos = self.pos.saturating_sub(1),
            KeyCode::Right => self.pos = (self.pos + 1).min(self.graphemes.len()),
            KeyCode::Home => self.pos = 0,
            KeyCode::End => self.pos = self.graphemes.len(),
            _ => {}
        }
        false
    }

    fn delete_word_backward(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let mut start = self.pos;
        while start > 0 && self.graphemes[start - 1].trim().is_empty() {
            start -= 1;
        }
        while start > 0 && !self.graphemes[start - 1].trim().is_empty() {
            start -= 1;
        }
        self.graphemes.drain(start..self.pos);
        self.pos = start;
        true
    }

    /// Renders prompt, text and cursor within `width` cells.
    #[must_use]
    pub fn view(&self, styles: &Styles, width: usize) -> String {
        let prompt = styles.prompt.clone().inline(true).render(&self.prompt);
        if self.graphemes.is_empty() && !self.focused {
            return format!(
                "{prompt}{}",
                styles.placeholder.clone().inline(true).render(&self.placeholder)
            );
        }

        // Keep the cursor visible: drop graphemes from the left until the
        // text up to the cursor fits.
        let available = width.saturating_sub(self.prompt.width() + 1).max(1);
        let mut start = 0;
        while start < self.pos
            && self.graphemes[start..self.pos].concat().width() > available
        {
            start += 1;
        }

        let before: String = self.graphemes[start..self.pos].concat();
        let mut out = format!("{prompt}{before}");
        if self.focused {
            let under = self.graphemes.get(self.pos).map_or(" ", String::as_str);
            out.push_str(&styles.cursor.clone().inline(true).render(under));
            if self.pos + 1 < self.graphemes.len() {
                out.push_str(&self.graphemes[self.pos + 1..].concat());
            }
        } else {
            out.push_str(&self.graphemes[self.pos..].concat());
        }
        out
    }
}
