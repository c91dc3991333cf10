//! Scrolling card grid.
//!
//! Cards are laid out left to right in as many columns as the width allows.
//! The grid scrolls by whole card rows and keeps the cursor on screen. A
//! sentinel row sits after the last card row while a loader is attached;
//! [`Grid::metrics`] reports where it is so the loader can decide whether to
//! fetch more.

use lipgloss_extras::lipgloss;
use unicode_width::UnicodeWidthChar;

use super::style::Styles;
use crate::api::format::{format_name, format_number};
use crate::api::ListItem;
use crate::catalog::{match_indices, SearchTerm, UNKNOWN_ID};
use crate::details::{DetailState, DetailStore};
use crate::loader::{ScrollMetrics, SentinelRef};

/// Content width of a card, padding excluded.
pub const CARD_INNER: usize = 20;
/// Full card width: content, one cell of padding per side, two border cells.
pub const CARD_WIDTH: usize = CARD_INNER + 4;
/// Card height in lines, borders included.
pub const CARD_HEIGHT: usize = 4;
const GAP: usize = 1;

/// Cursor and scroll position over a list of cards.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cursor: usize,
    len: usize,
    top_row: usize,
    width: usize,
    height: usize,
    sentinel: Option<SentinelRef>,
}

impl Grid {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the area available to the grid, in cells and lines.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.scroll_to_cursor();
    }

    /// Updates the number of cards, clamping the cursor.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.cursor = self.cursor.min(len.saturating_sub(1));
        let max_top = self.rows().saturating_sub(self.visible_rows());
        self.top_row = self.top_row.min(max_top);
        self.scroll_to_cursor();
    }

    /// Attaches or detaches the loader's sentinel row.
    pub fn attach_sentinel(&mut self, sentinel: Option<SentinelRef>) {
        self.sentinel = sentinel;
    }

    /// The attached sentinel, if any.
    #[must_use]
    pub fn sentinel(&self) -> Option<&SentinelRef> {
        self.sentinel.as_ref()
    }

    /// Index of the highlighted card.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index of the highlighted card, `None` when the grid is empty.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        (self.cursor < self.len).then_some(self.cursor)
    }

    /// Cards per row at the current width.
    #[must_use]
    pub fn columns(&self) -> usize {
        ((self.width + GAP) / (CARD_WIDTH + GAP)).max(1)
    }

    fn rows(&self) -> usize {
        self.len.div_ceil(self.columns())
    }

    fn visible_rows(&self) -> usize {
        (self.height / CARD_HEIGHT).max(1)
    }

    fn scroll_to_cursor(&mut self) {
        let row = self.cursor / self.columns();
        let visible = self.visible_rows();
        if row < self.top_row {
            self.top_row = row;
        } else if row >= self.top_row + visible {
            self.top_row = row + 1 - visible;
        }
    }

    fn set_cursor(&mut self, cursor: usize) {
        if self.len == 0 {
            return;
        }
        self.cursor = cursor.min(self.len - 1);
        self.scroll_to_cursor();
    }

    /// Puts the cursor on card `index`, scrolling it into view.
    pub fn select(&mut self, index: usize) {
        self.set_cursor(index);
    }

    /// One row up.
    pub fn move_up(&mut self) {
        self.set_cursor(self.cursor.saturating_sub(self.columns()));
    }

    /// One row down.
    pub fn move_down(&mut self) {
        let next = self.cursor + self.columns();
        // On the last, partially filled row, stay put rather than jumping.
        if next < self.len {
            self.set_cursor(next);
        }
    }

    /// One card left.
    pub fn move_left(&mut self) {
        self.set_cursor(self.cursor.saturating_sub(1));
    }

    /// One card right.
    pub fn move_right(&mut self) {
        self.set_cursor(self.cursor + 1);
    }

    /// One screen up.
    pub fn page_up(&mut self) {
        let step = self.visible_rows() * self.columns();
        self.set_cursor(self.cursor.saturating_sub(step));
    }

    /// One screen down.
    pub fn page_down(&mut self) {
        let step = self.visible_rows() * self.columns();
        self.set_cursor(self.cursor + step);
    }

    /// First card.
    pub fn first(&mut self) {
        self.set_cursor(0);
    }

    /// Last card.
    pub fn last(&mut self) {
        self.set_cursor(self.len.saturating_sub(1));
    }

    /// Indices of the cards currently on screen.
    #[must_use]
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let columns = self.columns();
        let start = (self.top_row * columns).min(self.len);
        let end = ((self.top_row + self.visible_rows()) * columns).min(self.len);
        start..end
    }

    /// Layout of the scrolled content in lines, sentinel included.
    #[must_use]
    pub fn metrics(&self) -> ScrollMetrics {
        let cards_height = self.rows() * CARD_HEIGHT;
        let sentinel_row = self.sentinel.as_ref().map(|_| cards_height);
        ScrollMetrics {
            offset: self.top_row * CARD_HEIGHT,
            viewport_height: self.visible_rows() * CARD_HEIGHT,
            content_height: cards_height + usize::from(sentinel_row.is_some()),
            sentinel_row,
        }
    }

    /// Renders the visible rows of `items`.
    #[must_use]
    pub fn view(
        &self,
        items: &[ListItem],
        details: &DetailStore,
        search: &SearchTerm,
        styles: &Styles,
    ) -> String {
        let range = self.visible_range();
        let columns = self.columns();
        let Some(visible) = items.get(range.clone()) else {
            return String::new();
        };

        let mut rows = Vec::new();
        for (row_index, row) in visible.chunks(columns).enumerate() {
            let mut cards = Vec::with_capacity(row.len() * 2);
            for (col, item) in row.iter().enumerate() {
                let index = range.start + row_index * columns + col;
                if col > 0 {
                    cards.push(" ".repeat(GAP));
                }
                cards.push(card(item, index == self.cursor, details, search, styles));
            }
            let parts: Vec<&str> = cards.iter().map(String::as_str).collect();
            rows.push(lipgloss::join_horizontal(lipgloss::TOP, &parts));
        }
        rows.join("\n")
    }
}

fn card(
    item: &ListItem,
    selected: bool,
    details: &DetailStore,
    search: &SearchTerm,
    styles: &Styles,
) -> String {
    let id = item.id();
    let number = if id == UNKNOWN_ID {
        "#???".to_string()
    } else {
        format_number(id)
    };
    let name_room = CARD_INNER.saturating_sub(number.chars().count() + 1);
    let title = format!(
        "{} {}",
        styles.number.clone().inline(true).render(&number),
        highlighted_name(&item.name, search, name_room, styles)
    );

    let types = match details.get(id) {
        Some(DetailState::Loaded(record)) => record
            .pokemon
            .type_names()
            .iter()
            .map(|t| styles.type_badge(t))
            .collect::<Vec<_>>()
            .join(" "),
        Some(DetailState::Failed(_)) => styles.error.clone().inline(true).render("unavailable"),
        _ => styles.subdued.clone().inline(true).render("…"),
    };

    let body = [title, types]
        .iter()
        .map(|line| pad(line, CARD_INNER))
        .collect::<Vec<_>>()
        .join("\n");
    let style = if selected {
        &styles.card_selected
    } else {
        &styles.card
    };
    style.render(&body)
}

fn highlighted_name(name: &str, search: &SearchTerm, room: usize, styles: &Styles) -> String {
    let display = format_name(name);
    let indices = if display.chars().count() == name.chars().count() {
        match_indices(name, search)
    } else {
        Vec::new()
    };

    let (chars, truncated) = truncate(&display, room);
    let mut out = String::new();
    let mut run = String::new();
    let mut run_matches = false;
    let flush = |out: &mut String, run: &mut String, matched: bool| {
        if run.is_empty() {
            return;
        }
        let style = if matched { &styles.name_match } else { &styles.name };
        out.push_str(&style.clone().inline(true).render(run));
        run.clear();
    };
    for (i, c) in chars.iter().enumerate() {
        let matched = indices.contains(&i);
        if matched != run_matches {
            flush(&mut out, &mut run, run_matches);
            run_matches = matched;
        }
        run.push(*c);
    }
    flush(&mut out, &mut run, run_matches);
    if truncated {
        out.push('…');
    }
    out
}

/// The longest prefix of `text` that fits `room` cells, leaving one cell
/// for an ellipsis when the text is cut.
fn truncate(text: &str, room: usize) -> (Vec<char>, bool) {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= room {
        return (text.chars().collect(), false);
    }
    let mut used = 0;
    let mut kept = Vec::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > room {
            break;
        }
        used += w;
        kept.push(c);
    }
    (kept, true)
}

fn pad(line: &str, width: usize) -> String {
    let visible = lipgloss::width_visible(line);
    format!("{line}{}", " ".repeat(width.saturating_sub(visible)))
}
