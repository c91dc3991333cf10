//! Sort selector and filter panel.
//!
//! The panel lists two range rows (minimum and maximum number) followed by
//! one row per type. Every change produces a new [`FilterState`]; the
//! controls never mutate the previous value in place.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyModifiers;

use super::keys::AppKeyMap;
use super::style::{Styles, BULLET};
use crate::api::format::{format_name, format_number};
use crate::catalog::{FilterState, SortOption, POKEMON_TYPES};
use crate::categories::CategoryStore;

const RANGE_ROWS: usize = 2;
const BIG_STEP: i64 = 10;

/// Something the rest of the screen has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// A new sort order was chosen.
    SortChanged(SortOption),
    /// Range or type selection changed.
    FiltersChanged(FilterState),
    /// A type was switched on; its membership may need fetching.
    CategorySelected(String),
    /// Filters and sort went back to their defaults; the owner clears the
    /// search term too.
    ClearedAll,
    /// The panel was closed.
    Closed,
}

/// Sort order, filters and the filter panel's cursor.
#[derive(Debug, Clone)]
pub struct Controls {
    sort: SortOption,
    filters: FilterState,
    open: bool,
    row: usize,
}

impl Controls {
    /// Default sort, no filters, panel closed.
    #[must_use]
    pub fn new(catalog_max: u32) -> Self {
        Self {
            sort: SortOption::default(),
            filters: FilterState::new(catalog_max),
            open: false,
            row: 0,
        }
    }

    /// Current sort order.
    #[must_use]
    pub fn sort(&self) -> SortOption {
        self.sort
    }

    /// Current filters.
    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Whether the filter panel is shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Highlighted panel row.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Shows the filter panel.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hides the filter panel.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Moves to the next sort order.
    pub fn cycle_sort(&mut self) -> ControlEvent {
        self.sort = self.sort.next();
        tracing::debug!(target: "pokedex::ui", sort = self.sort.value(), "sort changed");
        ControlEvent::SortChanged(self.sort)
    }

    fn row_count() -> usize {
        RANGE_ROWS + POKEMON_TYPES.len()
    }

    fn set_filters(&mut self, next: FilterState) -> ControlEvent {
        self.filters = next;
        ControlEvent::FiltersChanged(self.filters.clone())
    }

    /// Handles a key while the panel is open. Range steps that would leave
    /// the catalog bounds or cross the other end are refused.
    pub fn handle_key(&mut self, msg: &KeyMsg, keys: &AppKeyMap) -> Vec<ControlEvent> {
        if keys.back.matches(msg) || keys.filters.matches(msg) {
            self.close();
            return vec![ControlEvent::Closed];
        }
        if keys.up.matches(msg) {
            self.row = self.row.checked_sub(1).unwrap_or(Self::row_count() - 1);
            return Vec::new();
        }
        if keys.down.matches(msg) {
            self.row = (self.row + 1) % Self::row_count();
            return Vec::new();
        }
        if keys.clear_filters.matches(msg) {
            self.filters = self.filters.cleared();
            self.sort = SortOption::default();
            tracing::debug!(target: "pokedex::ui", "filters cleared");
            return vec![ControlEvent::ClearedAll];
        }

        let step = if msg.modifiers.contains(KeyModifiers::SHIFT) {
            BIG_STEP
        } else {
            1
        };
        if self.row < RANGE_ROWS {
            let delta = if keys.step_down.matches(msg) {
                -step
            } else if keys.step_up.matches(msg) {
                step
            } else {
                return Vec::new();
            };
            let next = if self.row == 0 {
                self.filters.shift_min(delta)
            } else {
                self.filters.shift_max(delta)
            };
            return next.map(|f| vec![self.set_filters(f)]).unwrap_or_default();
        }

        if keys.toggle.matches(msg) {
            let category = POKEMON_TYPES[self.row - RANGE_ROWS];
            let toggled = self.filters.toggle_category(category);
            let selected = toggled.categories().contains(category);
            let mut events = vec![self.set_filters(toggled)];
            if selected {
                events.push(ControlEvent::CategorySelected(category.to_string()));
            }
            return events;
        }
        Vec::new()
    }

    /// One-line summary shown under the search field.
    #[must_use]
    pub fn bar_view(&self, styles: &Styles) -> String {
        let range = self.filters.number_range();
        let mut parts = vec![format!(
            "{} {}",
            styles.label.clone().inline(true).render("Sort:"),
            self.sort.label()
        )];
        if range.min() != 1 || range.max() != self.filters.catalog_max() {
            parts.push(format!(
                "{} {}–{}",
                styles.label.clone().inline(true).render("Range:"),
                format_number(range.min()),
                format_number(range.max())
            ));
        }
        if !self.filters.categories().is_empty() {
            let names: Vec<String> = self
                .filters
                .categories()
                .iter()
                .map(|c| format_name(c))
                .collect();
            parts.push(format!(
                "{} {}",
                styles.label.clone().inline(true).render("Types:"),
                names.join(", ")
            ));
        }
        parts.join(&format!("  {BULLET}  "))
    }

    /// The open panel.
    #[must_use]
    pub fn panel_view(&self, styles: &Styles, categories: &CategoryStore) -> String {
        let range = self.filters.number_range();
        let marker = |row: usize| if row == self.row { "›" } else { " " };
        let mut lines = vec![
            styles.section.clone().inline(true).render("Filters"),
            format!("{} Min number  ◂ {} ▸", marker(0), format_number(range.min())),
            format!("{} Max number  ◂ {} ▸", marker(1), format_number(range.max())),
            String::new(),
        ];

        for (i, category) in POKEMON_TYPES.iter().enumerate() {
            let row = i + RANGE_ROWS;
            let checked = self.filters.categories().contains(*category);
            let mut line = format!(
                "{} [{}] {}",
                marker(row),
                if checked { "x" } else { " " },
                format_name(category)
            );
            if categories.is_loading(category) {
                line.push_str(&styles.subdued.clone().inline(true).render("  loading…"));
            } else if let Some(error) = categories.error(category) {
                line.push_str(
                    &styles
                        .error
                        .clone()
                        .inline(true)
                        .render(&format!("  {}", error.user_message())),
                );
            }
            if row == self.row {
                line = styles.active.clone().inline(true).render(&line);
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyCode;

    use super::*;
    use crate::api::UnavailableSource;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn shift(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    #[test]
    fn sort_cycles_through_all_options() {
        let mut controls = Controls::new(1010);
        let seen: Vec<SortOption> = (0..4)
            .map(|_| match controls.cycle_sort() {
                ControlEvent::SortChanged(s) => s,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(seen.last(), Some(&SortOption::IdAscending));
        assert_eq!(seen.len(), SortOption::ALL.len());
    }

    #[test]
    fn range_rows_step_and_refuse_invalid_values() {
        let keys = AppKeyMap::default();
        let mut controls = Controls::new(1010);
        controls.open();

        // Minimum cannot go below 1.
        assert!(controls.handle_key(&key(KeyCode::Left), &keys).is_empty());
        let events = controls.handle_key(&shift(KeyCode::Right), &keys);
        assert_eq!(events.len(), 1);
        assert_eq!(controls.filters().number_range().min(), 11);

        controls.handle_key(&key(KeyCode::Down), &keys);
        assert_eq!(controls.row(), 1);
        // Maximum cannot exceed the catalog.
        assert!(controls.handle_key(&key(KeyCode::Right), &keys).is_empty());
        controls.handle_key(&key(KeyCode::Left), &keys);
        assert_eq!(controls.filters().number_range().max(), 1009);
    }

    #[test]
    fn toggling_a_type_requests_its_members() {
        let keys = AppKeyMap::default();
        let mut controls = Controls::new(1010);
        controls.open();
        controls.handle_key(&key(KeyCode::Down), &keys);
        controls.handle_key(&key(KeyCode::Down), &keys);
        let events = controls.handle_key(&key(KeyCode::Char(' ')), &keys);
        assert!(events.contains(&ControlEvent::CategorySelected("normal".into())));
        assert!(controls.filters().categories().contains("normal"));

        // Switching it off does not fetch.
        let events = controls.handle_key(&key(KeyCode::Char(' ')), &keys);
        assert_eq!(events.len(), 1);
        assert!(!controls.filters().is_active());
    }

    #[test]
    fn clear_all_and_close() {
        let keys = AppKeyMap::default();
        let mut controls = Controls::new(1010);
        controls.open();
        controls.handle_key(&key(KeyCode::Right), &keys);
        controls.cycle_sort();
        assert!(controls.filters().is_active());
        assert_eq!(
            controls.handle_key(&key(KeyCode::Char('c')), &keys),
            vec![ControlEvent::ClearedAll]
        );
        assert!(!controls.filters().is_active());
        assert_eq!(controls.sort(), SortOption::default());

        assert_eq!(
            controls.handle_key(&key(KeyCode::Esc), &keys),
            vec![ControlEvent::Closed]
        );
        assert!(!controls.is_open());
    }

    #[test]
    fn views_describe_the_current_state() {
        let keys = AppKeyMap::default();
        let styles = Styles::default();
        let store = CategoryStore::new(Arc::new(UnavailableSource::new(
            crate::error::PokedexError::Runtime {
                details: "offline".into(),
            },
        )));
        let mut controls = Controls::new(1010);
        let plain = |s: String| String::from_utf8(strip_ansi_escapes::strip(s)).unwrap();

        assert_eq!(plain(controls.bar_view(&styles)), "Sort: Number (ascending)");
        controls.open();
        controls.handle_key(&key(KeyCode::Right), &keys);
        let bar = plain(controls.bar_view(&styles));
        assert!(bar.contains("Range: #002–#1010"), "{bar}");

        let panel = plain(controls.panel_view(&styles, &store));
        assert!(panel.contains("› Min number  ◂ #002 ▸"), "{panel}");
        assert!(panel.contains("[ ] Dragon"));
    }
}
