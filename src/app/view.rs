//! Screen composition.

use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

use super::{App, Focus, PANEL_WIDTH};
use crate::api::format::format_name;
use crate::catalog::suggestions;
use crate::controller::RequestKind;
use crate::ui::details_view::{self, DetailContext};

impl App {
    pub(super) fn render(&self) -> String {
        let spinner = self.spinner.view();
        let (prev, next) = self.details_neighbours();
        let body = match &self.focus {
            Focus::Details(item) => details_view::view(
                item,
                self.details.get(item.id()),
                DetailContext {
                    styles: &self.styles,
                    language: &self.config.search.description_language,
                    width: self.width.saturating_sub(2),
                    spinner: &spinner,
                    prev,
                    next,
                },
            ),
            _ => self.list_body(),
        };

        let mut sections = vec![
            self.title_line(),
            self.search_input.view(&self.styles, self.width),
            self.controls.bar_view(&self.styles),
            String::new(),
            body,
        ];
        if !matches!(self.focus, Focus::Details(_)) {
            sections.push(self.status_line());
        }
        sections.push(self.help.view(&self.keys));
        sections.join("\n")
    }

    fn title_line(&self) -> String {
        let title = self.styles.title.render("Pokédex");
        let loaded = self.controller.items().len();
        let counts = match self.controller.state().total_count {
            Some(total) => format!("{loaded} of {total} loaded"),
            None => format!("{loaded} loaded"),
        };
        format!(
            "{title}  {}",
            self.styles.subtitle.clone().inline(true).render(&counts)
        )
    }

    fn list_body(&self) -> String {
        let content = self.list_content();
        if !self.controls.is_open() {
            return content;
        }
        let panel = self
            .controls
            .panel_view(&self.styles, &self.categories);
        let left = Style::new()
            .width(self.grid_width() as i32)
            .render(&content);
        let right = Style::new()
            .width(PANEL_WIDTH as i32)
            .padding(0, 0, 0, 2)
            .render(&panel);
        lipgloss::join_horizontal(lipgloss::TOP, &[left.as_str(), right.as_str()])
    }

    fn list_content(&self) -> String {
        let items = self.controller.items();
        let failure = self.controller.failure();

        if items.is_empty() {
            if let Some(failure) = failure.filter(|f| f.kind() == RequestKind::Initial) {
                return self.styles.error_panel.render(&format!(
                    "{}\n{}",
                    self.styles
                        .error
                        .clone()
                        .inline(true)
                        .render(&format!("Couldn't load the Pokédex. {}", failure.error.user_message())),
                    self.styles
                        .subdued
                        .clone()
                        .inline(true)
                        .render("Press r to try again.")
                ));
            }
            if self.controller.is_loading_initial() {
                return format!("{}Loading Pokémon…", self.spinner.view());
            }
        }

        if self.visible_items().is_empty() {
            return self.empty_message();
        }

        self.grid.view(
            self.visible_items(),
            &self.details,
            &self.search,
            &self.styles,
        )
    }

    fn empty_message(&self) -> String {
        let styles = &self.styles;
        if self.search.is_active() {
            let mut lines = vec![format!(
                "No Pokémon found matching \"{}\".",
                self.search.raw().trim()
            )];
            let names = suggestions(
                &self.search,
                self.controller.items(),
                self.config.search.max_suggestions,
            );
            if !names.is_empty() {
                let names: Vec<String> = names.iter().map(|n| format_name(n)).collect();
                lines.push(format!("Did you mean: {}?", names.join(", ")));
            }
            lines.push(
                styles
                    .subdued
                    .clone()
                    .inline(true)
                    .render("Only Pokémon loaded so far are searched. Press esc to clear."),
            );
            return lines.join("\n");
        }

        let pending = self
            .controls
            .filters()
            .categories()
            .iter()
            .any(|c| self.categories.is_loading(c));
        if pending {
            return format!("{}Loading type data…", self.spinner.view());
        }
        if self.controls.filters().is_active() {
            return format!(
                "No Pokémon match the current filters.\n{}",
                styles
                    .subdued
                    .clone()
                    .inline(true)
                    .render("Open the filter panel with f and press c to clear them.")
            );
        }
        "No Pokémon to show.".to_string()
    }

    fn status_line(&self) -> String {
        let styles = &self.styles;
        let state = self.controller.state();

        let failure = self
            .controller
            .failure()
            .filter(|f| !(self.search.is_active() && f.kind() == RequestKind::LoadMore));
        if let Some(failure) = failure {
            if self.controller.items().is_empty() && failure.kind() == RequestKind::Initial {
                // The body already shows the error panel.
                return String::new();
            }
            let what = match failure.kind() {
                RequestKind::Initial => "Couldn't load the Pokédex.",
                RequestKind::LoadMore => "Couldn't load more Pokémon.",
            };
            return styles.error.clone().inline(true).render(&format!(
                "{what} {} Press r to retry.",
                failure.error.user_message()
            ));
        }
        if state.is_loading_more {
            return format!("{}Loading more Pokémon…", self.spinner.view());
        }
        if state.is_preparing {
            return styles.status.clone().inline(true).render("Preparing more…");
        }

        let shown = self.visible_items().len();
        let loaded = self.controller.items().len();
        let text = if self.search.is_active() {
            format!(
                "{shown} {} for \"{}\" among {loaded} loaded",
                if shown == 1 { "result" } else { "results" },
                self.search.raw().trim()
            )
        } else if !state.has_more && loaded > 0 && !self.controller.is_loading() {
            format!("You've reached the end of the Pokédex. Showing {shown} of {loaded}.")
        } else {
            format!("Showing {shown} of {loaded} loaded")
        };
        styles.status.clone().inline(true).render(&text)
    }
}
