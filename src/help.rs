//! Help footer rendered from a [`KeyMap`].
//!
//! The short form lists the essential bindings on one line and truncates with
//! an ellipsis when the terminal is too narrow; the full form lays groups out
//! as columns.

use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

use crate::key::{Binding, KeyMap};

/// Colors for the help footer.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style of the ellipsis shown when help is truncated.
    pub ellipsis: Style,
    /// Style of the key column.
    pub key: Style,
    /// Style of the description.
    pub desc: Style,
    /// Style of the separators.
    pub separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let separator = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: separator.clone(),
            key,
            desc,
            separator,
        }
    }
}

/// Help view state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Show the full multi-column help instead of the single line.
    pub show_all: bool,
    /// Maximum width in cells; zero means unlimited.
    pub width: usize,
    /// Separator between short help entries.
    pub short_separator: String,
    /// Separator between full help columns.
    pub full_separator: String,
    /// Marker shown when the short help is cut to fit.
    pub ellipsis: String,
    /// Text styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Help with default styles, showing the short form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches between short and full help.
    pub fn toggle(&mut self) {
        self.show_all = !self.show_all;
    }

    /// Renders the help for `keymap`.
    #[must_use]
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(&keymap.full_help())
        } else {
            self.short_help_view(&keymap.short_help())
        }
    }

    fn entry(&self, binding: &Binding) -> String {
        let help = binding.help();
        format!(
            "{} {}",
            self.styles.key.clone().inline(true).render(&help.key),
            self.styles.desc.clone().inline(true).render(&help.desc)
        )
    }

    fn short_help_view(&self, bindings: &[&Binding]) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        let mut out = String::new();
        let mut total_width = 0;
        for binding in bindings.iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let item = format!("{sep}{}", self.entry(binding));
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.overflow_tail(total_width, item_width) {
                out.push_str(&tail);
                break;
            }
            total_width += item_width;
            out.push_str(&item);
        }
        out
    }

    fn full_help_view(&self, groups: &[Vec<&Binding>]) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.full_separator);
        let separator_width = lipgloss::width_visible(&separator);

        let mut columns: Vec<String> = Vec::new();
        let mut total_width = 0;
        for group in groups {
            let rows: Vec<String> = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| self.entry(b))
                .collect();
            if rows.is_empty() {
                continue;
            }
            let column = rows.join("\n");
            let column_width = column
                .lines()
                .map(|line| lipgloss::width_visible(line))
                .max()
                .unwrap_or(0);
            let needed = if columns.is_empty() {
                column_width
            } else {
                column_width + separator_width
            };

            if let Some(tail) = self.overflow_tail(total_width, needed) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }
            total_width += needed;
            columns.push(column);
        }

        let mut parts: Vec<&str> = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(column.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    /// `Some(tail)` when an item of `item_width` no longer fits; the tail is
    /// the ellipsis if that still fits, otherwise empty.
    fn overflow_tail(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles.ellipsis.clone().inline(true).render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}
