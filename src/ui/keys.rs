//! Key bindings for the viewer.
//!
//! - **Grid**: `↑/k ↓/j ←/h →/l` move, `pgup/pgdn` page, `g/G` first/last,
//!   `enter` details
//! - **Controls**: `/` search, `s` cycle sort, `f` filter panel
//! - **Details**: `←/h` previous, `→/l` next
//! - **Filter panel**: `↑/↓` select row, `←/→` adjust range (hold shift for
//!   steps of ten), `space` toggle type, `c` clear all
//! - **Everywhere**: `r` retry, `?` help, `esc` back, `q` / `ctrl+c` quit

use crossterm::event::{KeyCode, KeyModifiers};

use crate::key::{self, Binding, KeyPress};

/// Which screen the help footer describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelpContext {
    /// Browsing the card grid.
    #[default]
    Grid,
    /// Typing in the search field.
    Search,
    /// Using the filter panel.
    Filters,
    /// Reading one creature's details.
    Details,
}

/// Every binding the viewer uses.
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Cursor up.
    pub up: Binding,
    /// Cursor down.
    pub down: Binding,
    /// Cursor left.
    pub left: Binding,
    /// Cursor right.
    pub right: Binding,
    /// Previous screen of cards.
    pub page_up: Binding,
    /// Next screen of cards.
    pub page_down: Binding,
    /// First card.
    pub first: Binding,
    /// Last card.
    pub last: Binding,
    /// Open the highlighted card.
    pub open: Binding,
    /// Previous creature on the detail screen.
    pub prev: Binding,
    /// Next creature on the detail screen.
    pub next: Binding,
    /// Leave the current screen or clear the search.
    pub back: Binding,
    /// Focus the search field.
    pub search: Binding,
    /// Apply the typed search now.
    pub accept_search: Binding,
    /// Cycle the sort order.
    pub sort: Binding,
    /// Open or close the filter panel.
    pub filters: Binding,
    /// Toggle the highlighted type.
    pub toggle: Binding,
    /// Clear filters, sort and search.
    pub clear_filters: Binding,
    /// Lower the highlighted range bound.
    pub step_down: Binding,
    /// Raise the highlighted range bound.
    pub step_up: Binding,
    /// Retry the failed request.
    pub retry: Binding,
    /// Toggle full help.
    pub help: Binding,
    /// Quit outside the search field.
    pub quit: Binding,
    /// Quit from anywhere.
    pub force_quit: Binding,
    /// Selects what [`key::KeyMap`] reports.
    pub context: HelpContext,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')]).with_help("↑/k", "up"),
            down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')]).with_help("↓/j", "down"),
            left: Binding::new(vec![KeyCode::Left, KeyCode::Char('h')]).with_help("←/h", "left"),
            right: Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/l", "right"),
            page_up: Binding::new(vec![KeyCode::PageUp, KeyCode::Char('b')])
                .with_help("pgup/b", "page up"),
            page_down: Binding::new(vec![KeyCode::PageDown, KeyCode::Char(' ')])
                .with_help("pgdn/space", "page down"),
            first: Binding::new(vec![KeyCode::Home, KeyCode::Char('g')])
                .with_help("g/home", "first"),
            last: Binding::new(vec![KeyCode::End, KeyCode::Char('G')]).with_help("G/end", "last"),
            open: Binding::new(vec![KeyCode::Enter]).with_help("enter", "details"),
            prev: Binding::new(vec![KeyCode::Left, KeyCode::Char('h')]).with_help("←/h", "prev"),
            next: Binding::new(vec![KeyCode::Right, KeyCode::Char('l')]).with_help("→/l", "next"),
            back: Binding::new(vec![KeyCode::Esc]).with_help("esc", "back"),
            search: Binding::new(vec![KeyCode::Char('/')]).with_help("/", "search"),
            accept_search: Binding::new(vec![KeyCode::Enter, KeyCode::Tab])
                .with_help("enter", "apply"),
            sort: Binding::new(vec![KeyCode::Char('s')]).with_help("s", "sort"),
            filters: Binding::new(vec![KeyCode::Char('f')]).with_help("f", "filters"),
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Enter])
                .with_help("space", "toggle type"),
            clear_filters: Binding::new(vec![KeyCode::Char('c')]).with_help("c", "clear all"),
            step_down: Binding::new(vec![
                KeyPress::from(KeyCode::Left),
                KeyPress::from((KeyCode::Left, KeyModifiers::SHIFT)),
                KeyPress::from(KeyCode::Char('h')),
                KeyPress::from(KeyCode::Char('-')),
            ])
            .with_help("←/-", "decrease"),
            step_up: Binding::new(vec![
                KeyPress::from(KeyCode::Right),
                KeyPress::from((KeyCode::Right, KeyModifiers::SHIFT)),
                KeyPress::from(KeyCode::Char('l')),
                KeyPress::from(KeyCode::Char('+')),
            ])
            .with_help("→/+", "increase"),
            retry: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "retry"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
            quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
            force_quit: Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)])
                .with_help("ctrl+c", "quit"),
            context: HelpContext::Grid,
        }
    }
}

impl key::KeyMap for AppKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        match self.context {
            HelpContext::Grid => vec![
                &self.up,
                &self.down,
                &self.open,
                &self.search,
                &self.sort,
                &self.filters,
                &self.help,
                &self.quit,
            ],
            HelpContext::Search => vec![&self.accept_search, &self.back, &self.force_quit],
            HelpContext::Filters => vec![
                &self.up,
                &self.down,
                &self.step_down,
                &self.step_up,
                &self.toggle,
                &self.clear_filters,
                &self.back,
            ],
            HelpContext::Details => {
                vec![&self.prev, &self.next, &self.back, &self.retry, &self.quit]
            }
        }
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        match self.context {
            HelpContext::Grid => vec![
                vec![&self.up, &self.down, &self.left, &self.right],
                vec![&self.page_up, &self.page_down, &self.first, &self.last],
                vec![&self.open, &self.search, &self.sort, &self.filters],
                vec![&self.retry, &self.help, &self.quit, &self.force_quit],
            ],
            _ => vec![self.short_help()],
        }
    }
}
