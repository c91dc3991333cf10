//! Key bindings with help text.
//!
//! A [`Binding`] groups the key presses that trigger one action together with
//! the short help shown in the footer:
//!
//! ```rust
//! use pokedex_tui::key::Binding;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let retry = Binding::new(vec![KeyCode::Char('r')]).with_help("r", "retry");
//! let quit = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)])
//!     .with_help("ctrl+c", "quit");
//!
//! let msg = KeyMsg { key: KeyCode::Char('r'), modifiers: KeyModifiers::NONE };
//! assert!(retry.matches(&msg));
//! assert!(!quit.matches(&msg));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// One key press: a code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Key code.
    pub code: KeyCode,
    /// Modifiers that must be held.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        // Shift is already folded into the character for printable keys.
        let relevant = if matches!(msg.key, KeyCode::Char(_)) {
            msg.modifiers.difference(KeyModifiers::SHIFT)
        } else {
            msg.modifiers
        };
        relevant == self.modifiers
    }
}

/// Help text for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Key label, e.g. `ctrl+c`.
    pub key: String,
    /// What the key does.
    pub desc: String,
}

/// A set of key presses bound to one action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// A binding triggered by any of `keys`.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the footer help text.
    #[must_use]
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Key presses that trigger the binding.
    #[must_use]
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Footer help text.
    #[must_use]
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Disabled bindings never match and are left out of the help view.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the binding is active.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Whether `msg` is one of the binding's key presses.
    #[must_use]
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Bindings a component exposes to the help view.
pub trait KeyMap {
    /// Essentials, rendered on one line.
    fn short_help(&self) -> Vec<&Binding>;
    /// Everything, grouped into columns.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg { key, modifiers }
    }

    #[test]
    fn shifted_characters_match_plain_bindings() {
        let end = Binding::new(vec![KeyCode::Char('G'), KeyCode::End]);
        assert!(end.matches(&press(KeyCode::Char('G'), KeyModifiers::SHIFT)));
        assert!(end.matches(&press(KeyCode::End, KeyModifiers::NONE)));
        assert!(!end.matches(&press(KeyCode::End, KeyModifiers::SHIFT)));
    }

    #[test]
    fn modifiers_must_match() {
        let quit = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        assert!(quit.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!quit.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn disabled_bindings_never_match() {
        let mut retry = Binding::new(vec![KeyCode::Char('r')]).with_help("r", "retry");
        retry.set_enabled(false);
        assert!(!retry.enabled());
        assert!(!retry.matches(&press(KeyCode::Char('r'), KeyModifiers::NONE)));
        assert_eq!(retry.help().desc, "retry");
    }
}
