//! The bubbletea program: routes messages between the page controller, the
//! loader, the detail and type stores and the screen components.
//!
//! `bubbletea_rs::Model::init` takes no arguments, so the binary stores its
//! configuration and API source with [`set_launch`] before starting the
//! program. Without it the app starts from the default configuration.

use std::sync::Arc;

use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use once_cell::sync::OnceCell;

use crate::api::{ListItem, PokeApiClient, SharedSource, UnavailableSource};
use crate::catalog::{SearchTerm, ViewModel, UNKNOWN_ID};
use crate::categories::{CategoryStore, TypeLoadedMsg};
use crate::config::Config;
use crate::controller::{PageController, PageLoadedMsg};
use crate::debounce::{DebounceMsg, Debouncer};
use crate::details::{DetailLoadedMsg, DetailState, DetailStore};
use crate::error::{PokedexError, Result};
use crate::help;
use crate::loader::{LoadMoreMsg, Loader, LoaderOptions, PrepareDoneMsg, ScrollMetrics, VisibilityMsg};
use crate::spinner;
use crate::ui::grid::CARD_HEIGHT;
use crate::ui::{AppKeyMap, ControlEvent, Controls, Grid, HelpContext, SearchInput, Styles};

#[cfg(test)]
mod tests;
mod view;

/// Lines above the grid: title, search field, controls bar, spacer.
const HEADER_LINES: usize = 4;
/// Width reserved for the filter panel when it is open.
const PANEL_WIDTH: usize = 30;

/// What the program runs with.
#[derive(Clone)]
pub struct Launch {
    /// Viewer settings.
    pub config: Config,
    /// Where listings and records come from.
    pub source: SharedSource,
}

impl std::fmt::Debug for Launch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launch")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Launch {
    /// Runs with an explicit source, e.g. a fake one in tests.
    #[must_use]
    pub fn new(config: Config, source: SharedSource) -> Self {
        Self { config, source }
    }

    /// Builds the HTTP client from `config`. If that fails the app still
    /// starts, and every request reports the construction error.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let source: SharedSource = match PokeApiClient::new(&config.api) {
            Ok(client) => Arc::new(client),
            Err(error) => {
                tracing::error!(code = error.code(), %error, "API client unavailable");
                Arc::new(UnavailableSource::new(error))
            }
        };
        Self { config, source }
    }
}

static LAUNCH: OnceCell<Launch> = OnceCell::new();

/// Stores the settings [`App::init`](BubbleTeaModel::init) picks up. Can be
/// called once per process.
pub fn set_launch(launch: Launch) -> Result<()> {
    LAUNCH.set(launch).map_err(|_| PokedexError::Runtime {
        details: "launch settings were already set".to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Focus {
    Grid,
    Search,
    Filters,
    Details(ListItem),
}

/// Everything that decides whether the loader needs a fresh layout report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutKey {
    metrics: ScrollMetrics,
    has_more: bool,
    is_loading: bool,
}

/// The viewer.
pub struct App {
    config: Config,
    styles: Styles,
    keys: AppKeyMap,
    help: help::Model,
    spinner: spinner::Model,
    controller: PageController,
    details: DetailStore,
    categories: CategoryStore,
    loader: Loader,
    debouncer: Debouncer,
    search_input: SearchInput,
    controls: Controls,
    search: SearchTerm,
    view_model: ViewModel,
    grid: Grid,
    focus: Focus,
    width: usize,
    height: usize,
    loader_state: Option<(bool, bool)>,
    last_layout: Option<LayoutKey>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("controller", &self.controller)
            .field("focus", &self.focus)
            .field("search", &self.search)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl App {
    /// A viewer with nothing loaded; [`start`](Self::start) requests the first page.
    #[must_use]
    pub fn new(launch: Launch) -> Self {
        let Launch { config, source } = launch;
        let styles = Styles::default();
        // Grid metrics are in terminal lines; the setting counts card rows.
        let loader = Loader::new(LoaderOptions {
            threshold: config.loader.threshold_rows * CARD_HEIGHT,
            prepare_delay: config.loader.prepare_delay(),
            mode: config.loader.mode,
            ..LoaderOptions::default()
        });
        Self {
            help: help::Model::new(),
            spinner: spinner::Model::new().with_style(styles.spinner.clone()),
            controller: PageController::new(source.clone(), config.list.page_size),
            details: DetailStore::new(source.clone()),
            categories: CategoryStore::new(source),
            loader,
            debouncer: Debouncer::new(config.search.debounce()),
            search_input: SearchInput::new(),
            controls: Controls::new(config.list.catalog_max),
            search: SearchTerm::default(),
            view_model: ViewModel::new(),
            grid: Grid::new(),
            focus: Focus::Grid,
            width: 80,
            height: 24,
            loader_state: None,
            last_layout: None,
            keys: AppKeyMap::default(),
            styles,
            config,
        }
    }

    /// Kicks off the first page.
    pub fn start(&mut self) -> Option<Cmd> {
        tracing::info!(
            page_size = self.controller.page_size(),
            "starting pokedex"
        );
        let mut cmds = vec![self.controller.load_initial()];
        cmds.extend(self.sync());
        batch(cmds)
    }

    /// The items currently shown, after search, filters and sort.
    #[must_use]
    pub fn visible_items(&self) -> &[ListItem] {
        self.view_model.items()
    }

    fn selected_item(&self) -> Option<&ListItem> {
        self.grid
            .selected()
            .and_then(|i| self.view_model.items().get(i))
    }

    fn help_context(&self) -> HelpContext {
        match self.focus {
            Focus::Grid => HelpContext::Grid,
            Focus::Search => HelpContext::Search,
            Focus::Filters => HelpContext::Filters,
            Focus::Details(_) => HelpContext::Details,
        }
    }

    fn help_lines(&self) -> usize {
        self.help.view(&self.keys).lines().count().max(1)
    }

    fn grid_width(&self) -> usize {
        if self.controls.is_open() {
            self.width.saturating_sub(PANEL_WIDTH + 2)
        } else {
            self.width
        }
    }

    fn body_height(&self) -> usize {
        // One status line plus the help footer.
        self.height
            .saturating_sub(HEADER_LINES + 1 + self.help_lines())
    }

    /// Brings derived state up to date after any change and returns the
    /// follow-up commands: loader timers, detail prefetches, spinner ticks.
    fn sync(&mut self) -> Vec<Cmd> {
        let mut cmds = Vec::new();
        self.keys.context = self.help_context();

        let len = self
            .view_model
            .derive(
                self.controller.items(),
                self.controller.revision(),
                self.controls.filters(),
                self.controls.sort(),
                &self.search,
                Some(self.categories.lookup()),
            )
            .len();
        let (width, height) = (self.grid_width(), self.body_height());
        self.grid.set_size(width, height);
        self.grid.set_len(len);

        let has_more = self.controller.loader_has_more();
        let is_loading = self.controller.is_loading();
        if self.loader_state != Some((has_more, is_loading)) {
            self.loader.set_state(has_more, is_loading);
            self.loader_state = Some((has_more, is_loading));
        }
        self.grid
            .attach_sentinel(if has_more { self.loader.sentinel() } else { None });

        if matches!(self.focus, Focus::Details(_)) {
            // The grid is hidden; report it again when it comes back.
            self.last_layout = None;
        } else {
            let key = LayoutKey {
                metrics: self.grid.metrics(),
                has_more,
                is_loading,
            };
            if self.last_layout != Some(key) {
                self.last_layout = Some(key);
                if let Some(sentinel) = self.grid.sentinel() {
                    let report: Msg = Box::new(sentinel.visibility(key.metrics));
                    cmds.extend(self.loader.update(&report));
                }
            }
            cmds.extend(self.prefetch_visible());
        }
        self.controller.set_preparing(self.loader.is_preparing());

        let detail_loading = match &self.focus {
            Focus::Details(item) => {
                matches!(self.details.get(item.id()), Some(DetailState::Loading))
            }
            _ => false,
        };
        let busy = self.controller.is_loading() || self.loader.is_preparing() || detail_loading;
        cmds.extend(self.spinner.set_active(busy));
        cmds
    }

    fn prefetch_visible(&mut self) -> Vec<Cmd> {
        let ids: Vec<u32> = self
            .view_model
            .items()
            .get(self.grid.visible_range())
            .unwrap_or_default()
            .iter()
            .map(ListItem::id)
            .filter(|id| *id != UNKNOWN_ID)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.details.request(id))
            .collect()
    }

    /// Applies a search term. An unchanged term does nothing.
    fn apply_search(&mut self, value: &str) -> Vec<Cmd> {
        let term = SearchTerm::new(value);
        if term.normalized() == self.search.normalized() {
            self.search = term;
            return Vec::new();
        }
        tracing::debug!(term = %term.normalized(), "search applied");
        self.search = term.clone();
        self.grid.first();
        self.controller.set_search(term).into_iter().collect()
    }

    fn open_details(&mut self) -> Vec<Cmd> {
        let Some(item) = self.selected_item().cloned() else {
            return Vec::new();
        };
        let id = item.id();
        self.focus = Focus::Details(item);
        if id == UNKNOWN_ID {
            return Vec::new();
        }
        self.details.request(id).into_iter().collect()
    }

    fn retry(&mut self) -> Vec<Cmd> {
        if let Some(cmd) = self.controller.retry() {
            return vec![cmd];
        }
        let id = match &self.focus {
            Focus::Details(item) => Some(item.id()),
            _ => self.selected_item().map(ListItem::id),
        };
        id.and_then(|id| self.details.retry(id))
            .into_iter()
            .collect()
    }

    fn on_key(&mut self, key: &KeyMsg) -> (Vec<Cmd>, bool) {
        if self.keys.force_quit.matches(key) {
            return (Vec::new(), true);
        }
        match self.focus.clone() {
            Focus::Search => (self.on_search_key(key), false),
            Focus::Filters => self.on_filter_key(key),
            Focus::Details(_) => self.on_details_key(key),
            Focus::Grid => self.on_grid_key(key),
        }
    }

    fn on_search_key(&mut self, key: &KeyMsg) -> Vec<Cmd> {
        if self.keys.back.matches(key) {
            self.search_input.blur();
            self.focus = Focus::Grid;
            return Vec::new();
        }
        if self.keys.accept_search.matches(key) {
            self.debouncer.cancel();
            self.search_input.blur();
            self.focus = Focus::Grid;
            let value = self.search_input.value();
            return self.apply_search(&value);
        }
        if self.search_input.handle_key(key) {
            return vec![self.debouncer.schedule(self.search_input.value())];
        }
        Vec::new()
    }

    fn on_filter_key(&mut self, key: &KeyMsg) -> (Vec<Cmd>, bool) {
        if self.keys.quit.matches(key) {
            return (Vec::new(), true);
        }
        let mut cmds = Vec::new();
        for event in self.controls.handle_key(key, &self.keys) {
            match event {
                ControlEvent::FiltersChanged(_) | ControlEvent::SortChanged(_) => {
                    self.grid.first();
                }
                ControlEvent::CategorySelected(category) => {
                    cmds.extend(self.categories.request(&category));
                }
                ControlEvent::ClearedAll => {
                    self.grid.first();
                    if self.search.is_active() || !self.search_input.value().is_empty() {
                        self.search_input.set_value("");
                        self.debouncer.cancel();
                        cmds.extend(self.apply_search(""));
                    }
                }
                ControlEvent::Closed => self.focus = Focus::Grid,
            }
        }
        (cmds, false)
    }

    fn on_details_key(&mut self, key: &KeyMsg) -> (Vec<Cmd>, bool) {
        if self.keys.quit.matches(key) {
            return (Vec::new(), true);
        }
        if self.keys.back.matches(key) || key.key == crossterm::event::KeyCode::Backspace {
            self.focus = Focus::Grid;
        } else if self.keys.retry.matches(key) {
            return (self.retry(), false);
        } else if self.keys.prev.matches(key) {
            return (self.step_details(false), false);
        } else if self.keys.next.matches(key) {
            return (self.step_details(true), false);
        }
        (Vec::new(), false)
    }

    /// Position of the open detail record in the visible listing.
    fn details_index(&self) -> Option<usize> {
        let Focus::Details(current) = &self.focus else {
            return None;
        };
        self.view_model.items().iter().position(|i| i == current)
    }

    /// The visible neighbours of the open detail record.
    fn details_neighbours(&self) -> (Option<&ListItem>, Option<&ListItem>) {
        let items = self.view_model.items();
        match self.details_index() {
            Some(index) => (
                index.checked_sub(1).and_then(|i| items.get(i)),
                items.get(index + 1),
            ),
            None => (None, None),
        }
    }

    /// Moves the detail screen to the previous or next visible creature and
    /// keeps the grid cursor on it. Stops at either end.
    fn step_details(&mut self, forward: bool) -> Vec<Cmd> {
        let Some(index) = self.details_index() else {
            return Vec::new();
        };
        let target = if forward {
            index + 1
        } else {
            match index.checked_sub(1) {
                Some(target) => target,
                None => return Vec::new(),
            }
        };
        let Some(item) = self.view_model.items().get(target).cloned() else {
            return Vec::new();
        };
        self.grid.select(target);
        let id = item.id();
        self.focus = Focus::Details(item);
        if id == UNKNOWN_ID {
            return Vec::new();
        }
        self.details.request(id).into_iter().collect()
    }

    fn on_grid_key(&mut self, key: &KeyMsg) -> (Vec<Cmd>, bool) {
        let keys = &self.keys;
        if keys.quit.matches(key) {
            return (Vec::new(), true);
        }
        if keys.help.matches(key) {
            self.help.toggle();
        } else if keys.search.matches(key) {
            self.search_input.focus();
            self.focus = Focus::Search;
        } else if keys.sort.matches(key) {
            self.controls.cycle_sort();
            self.grid.first();
        } else if keys.filters.matches(key) {
            self.controls.open();
            self.focus = Focus::Filters;
        } else if keys.retry.matches(key) {
            return (self.retry(), false);
        } else if keys.open.matches(key) {
            return (self.open_details(), false);
        } else if keys.back.matches(key) {
            if self.search.is_active() {
                self.search_input.set_value("");
                self.debouncer.cancel();
                return (self.apply_search(""), false);
            }
        } else if keys.up.matches(key) {
            self.grid.move_up();
        } else if keys.down.matches(key) {
            self.grid.move_down();
        } else if keys.left.matches(key) {
            self.grid.move_left();
        } else if keys.right.matches(key) {
            self.grid.move_right();
        } else if keys.page_up.matches(key) {
            self.grid.page_up();
        } else if keys.page_down.matches(key) {
            self.grid.page_down();
        } else if keys.first.matches(key) {
            self.grid.first();
        } else if keys.last.matches(key) {
            self.grid.last();
        }
        (Vec::new(), false)
    }

    /// Handles one message; returns the commands to run and whether to quit.
    fn handle(&mut self, msg: &Msg) -> (Vec<Cmd>, bool) {
        if msg.downcast_ref::<spinner::TickMsg>().is_some() {
            return (self.spinner.update(msg).into_iter().collect(), false);
        }

        let mut cmds = Vec::new();
        let mut quit = false;
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            (cmds, quit) = self.on_key(key);
        } else if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.width = usize::from(size.width);
            self.height = usize::from(size.height);
            self.help.width = self.width;
        } else if let Some(page) = msg.downcast_ref::<PageLoadedMsg>() {
            self.controller.on_page_loaded(page);
        } else if let Some(loaded) = msg.downcast_ref::<DetailLoadedMsg>() {
            self.details.on_loaded(loaded);
        } else if let Some(loaded) = msg.downcast_ref::<TypeLoadedMsg>() {
            self.categories.on_loaded(loaded);
        } else if let Some(debounced) = msg.downcast_ref::<DebounceMsg>() {
            if let Some(value) = self.debouncer.accept(debounced) {
                cmds = self.apply_search(&value);
            }
        } else if let Some(more) = msg.downcast_ref::<LoadMoreMsg>() {
            if more.id == self.loader.id() {
                cmds.extend(self.controller.load_more());
            }
        } else if msg.downcast_ref::<PrepareDoneMsg>().is_some()
            || msg.downcast_ref::<VisibilityMsg>().is_some()
        {
            cmds.extend(self.loader.update(msg));
        }

        if quit {
            tracing::info!("quitting");
            return (Vec::new(), true);
        }
        cmds.extend(self.sync());
        (cmds, false)
    }
}

fn batch(mut cmds: Vec<Cmd>) -> Option<Cmd> {
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(bubbletea_rs::batch(cmds)),
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let launch = LAUNCH
            .get()
            .cloned()
            .unwrap_or_else(|| Launch::from_config(Config::default()));
        let mut app = Self::new(launch);
        let cmd = app.start();
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let (cmds, quit) = self.handle(&msg);
        if quit {
            return Some(bubbletea_rs::quit());
        }
        batch(cmds)
    }

    fn view(&self) -> String {
        self.render()
    }
}
