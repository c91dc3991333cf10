use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};

use super::*;
use crate::api::models::PokemonSprites;
use crate::api::{ListPage, Pokemon, PokemonDetails};
use crate::catalog::SortOption;
use crate::controller::{PageRequest, RequestKind};
use crate::loader::ObserveMode;

const STARTERS: [&str; 9] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
    "wartortle",
    "blastoise",
];

// Commands are never awaited here: every response is delivered by hand so
// tests do not depend on timers or the network.
fn app() -> App {
    app_with(Config::default())
}

fn app_with(mut config: Config) -> App {
    config.list.page_size = 3;
    let source = Arc::new(UnavailableSource::new(PokedexError::Runtime {
        details: "offline".into(),
    }));
    let mut app = App::new(Launch::new(config, source));
    let _ = app.start();
    app
}

fn item(id: u32) -> ListItem {
    ListItem::new(
        STARTERS[id as usize - 1],
        format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
    )
}

fn page(app: &App, kind: RequestKind, offset: usize, count: u64) -> Msg {
    let results = (offset..(offset + 3).min(count as usize))
        .map(|i| item(i as u32 + 1))
        .collect();
    Box::new(PageLoadedMsg {
        controller_id: app.controller.id(),
        generation: app.controller.generation(),
        request: PageRequest {
            kind,
            offset,
            limit: 3,
        },
        result: Ok(ListPage {
            count,
            next: None,
            previous: None,
            results,
        }),
    })
}

fn failed_page(app: &App, kind: RequestKind, offset: usize) -> Msg {
    Box::new(PageLoadedMsg {
        controller_id: app.controller.id(),
        generation: app.controller.generation(),
        request: PageRequest {
            kind,
            offset,
            limit: 3,
        },
        result: Err(PokedexError::Timeout {
            endpoint: "pokemon".into(),
        }),
    })
}

fn key(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    })
}

fn send(app: &mut App, msg: Msg) -> bool {
    app.handle(&msg).1
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        send(app, key(KeyCode::Char(c)));
    }
}

fn screen(app: &App) -> String {
    String::from_utf8(strip_ansi_escapes::strip(app.render())).unwrap()
}

fn ids(app: &App) -> Vec<u32> {
    app.visible_items().iter().map(ListItem::id).collect()
}

#[test]
fn first_page_replaces_the_loading_state() {
    let mut app = app();
    assert!(screen(&app).contains("Loading Pokémon…"));

    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);
    let out = screen(&app);
    assert!(out.contains("#001 Bulbasaur"), "{out}");
    assert!(out.contains("#003 Venusaur"));
    assert!(out.contains("3 of 3 loaded"));
    assert!(out.contains("You've reached the end of the Pokédex."));
    assert!(!app.loader.is_preparing());
}

#[test]
fn initial_failure_shows_panel_and_retry_reloads() {
    let mut app = app();
    let msg = failed_page(&app, RequestKind::Initial, 0);
    send(&mut app, msg);
    let out = screen(&app);
    assert!(out.contains("Couldn't load the Pokédex."), "{out}");
    assert!(out.contains("Press r to try again."));
    assert!(!app.controller.is_loading());

    send(&mut app, key(KeyCode::Char('r')));
    assert!(app.controller.is_loading_initial());
    assert!(screen(&app).contains("Loading Pokémon…"));
}

#[test]
fn short_first_page_prepares_and_loads_more() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 9);
    send(&mut app, msg);
    // Three cards leave the sentinel on screen.
    assert!(app.loader.is_preparing());
    assert!(screen(&app).contains("Preparing more…"));

    let done = app.loader.prepare_done_msg();
    send(&mut app, Box::new(done));
    assert!(!app.loader.is_preparing());

    let more: Msg = Box::new(LoadMoreMsg { id: app.loader.id() });
    send(&mut app, more);
    assert!(app.controller.state().is_loading_more);
    assert!(screen(&app).contains("Loading more Pokémon…"));

    // A second trigger while loading is ignored.
    let generation = app.controller.generation();
    let more: Msg = Box::new(LoadMoreMsg { id: app.loader.id() });
    send(&mut app, more);
    assert_eq!(app.controller.generation(), generation);

    let msg = page(&app, RequestKind::LoadMore, 3, 9);
    send(&mut app, msg);
    assert_eq!(ids(&app), [1, 2, 3, 4, 5, 6]);
    assert_eq!(app.controller.state().next_offset, 6);
}

#[test]
fn loader_settings_come_from_config() {
    let app = app();
    assert_eq!(app.loader.options().threshold, 8 * CARD_HEIGHT);
    assert_eq!(app.loader.options().mode, ObserveMode::Intersection);

    let mut config = Config::default();
    config.loader.threshold_rows = 1;
    config.loader.mode = ObserveMode::ScrollEvents;
    let mut app = app_with(config);
    assert_eq!(app.loader.options().threshold, CARD_HEIGHT);

    // Without the sentinel watch there is no preparing phase.
    let msg = page(&app, RequestKind::Initial, 0, 9);
    send(&mut app, msg);
    assert!(!app.loader.is_preparing());
    assert!(!screen(&app).contains("Preparing more…"));
}

#[test]
fn load_more_failure_waits_for_retry() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 9);
    send(&mut app, msg);
    let more: Msg = Box::new(LoadMoreMsg { id: app.loader.id() });
    send(&mut app, more);
    let msg = failed_page(&app, RequestKind::LoadMore, 3);
    send(&mut app, msg);

    let out = screen(&app);
    assert!(out.contains("Couldn't load more Pokémon."), "{out}");
    assert!(out.contains("#001 Bulbasaur"));
    assert!(!app.controller.loader_has_more());

    send(&mut app, key(KeyCode::Char('r')));
    assert!(app.controller.state().is_loading_more);
    let msg = page(&app, RequestKind::LoadMore, 3, 9);
    send(&mut app, msg);
    assert_eq!(ids(&app).len(), 6);
}

#[test]
fn search_hides_and_holds_a_failed_load_more() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 9);
    send(&mut app, msg);
    let more: Msg = Box::new(LoadMoreMsg { id: app.loader.id() });
    send(&mut app, more);
    let msg = failed_page(&app, RequestKind::LoadMore, 3);
    send(&mut app, msg);

    send(&mut app, key(KeyCode::Char('/')));
    type_text(&mut app, "saur");
    send(&mut app, key(KeyCode::Enter));
    let out = screen(&app);
    assert!(!out.contains("Couldn't load more Pokémon."), "{out}");
    assert!(out.contains("results for \"saur\""));

    let generation = app.controller.generation();
    send(&mut app, key(KeyCode::Char('r')));
    assert!(!app.controller.is_loading());
    assert_eq!(app.controller.generation(), generation);
    assert_eq!(ids(&app), [1, 2, 3]);
}

#[test]
fn search_narrows_and_suggests() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);

    send(&mut app, key(KeyCode::Char('/')));
    type_text(&mut app, "BULBA");
    // Typing alone only schedules the search.
    assert!(app.debouncer.is_pending());
    assert_eq!(ids(&app), [1, 2, 3]);

    send(&mut app, key(KeyCode::Enter));
    assert!(!app.debouncer.is_pending());
    assert_eq!(ids(&app), [1]);
    assert!(screen(&app).contains("1 result for \"BULBA\""));

    send(&mut app, key(KeyCode::Char('/')));
    send(&mut app, Box::new(KeyMsg {
        key: KeyCode::Char('u'),
        modifiers: KeyModifiers::CONTROL,
    }));
    type_text(&mut app, "venusour");
    send(&mut app, key(KeyCode::Enter));
    let out = screen(&app);
    assert!(out.contains("No Pokémon found matching \"venusour\"."), "{out}");
    assert!(out.contains("Did you mean: Venusaur?"));
    assert!(app.controller.failure().is_none());
}

#[test]
fn clearing_the_search_reloads_from_the_start() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 9);
    send(&mut app, msg);
    send(&mut app, key(KeyCode::Char('/')));
    type_text(&mut app, "saur");
    send(&mut app, key(KeyCode::Enter));
    assert!(!app.controller.loader_has_more());

    send(&mut app, key(KeyCode::Esc));
    assert!(!app.search.is_active());
    assert!(app.controller.is_loading_initial());
}

#[test]
fn debounced_value_is_applied_when_current() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);
    send(&mut app, key(KeyCode::Char('/')));
    type_text(&mut app, "ivy");

    let stale = DebounceMsg {
        id: app.debouncer.id(),
        tag: 1,
        value: "i".into(),
    };
    send(&mut app, Box::new(stale));
    assert_eq!(ids(&app), [1, 2, 3]);

    let current = DebounceMsg {
        id: app.debouncer.id(),
        tag: 3,
        value: "ivy".into(),
    };
    send(&mut app, Box::new(current));
    assert_eq!(ids(&app), [2]);
}

#[test]
fn sort_key_cycles_order() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);
    send(&mut app, key(KeyCode::Char('s')));
    assert_eq!(app.controls.sort(), SortOption::IdDescending);
    assert_eq!(ids(&app), [3, 2, 1]);
    send(&mut app, key(KeyCode::Char('s')));
    assert_eq!(ids(&app), [1, 2, 3], "bulbasaur, ivysaur, venusaur");
    assert!(screen(&app).contains("Sort: Name (A-Z)"));
}

#[test]
fn filter_panel_narrows_by_range_and_type() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);

    send(&mut app, key(KeyCode::Char('f')));
    assert!(screen(&app).contains("Min number"));
    send(&mut app, key(KeyCode::Right));
    assert_eq!(ids(&app), [2, 3]);

    // Down twice to the first type row, then toggle it.
    send(&mut app, key(KeyCode::Down));
    send(&mut app, key(KeyCode::Down));
    send(&mut app, key(KeyCode::Char(' ')));
    assert!(app.categories.is_loading("normal"));
    // Unknown membership does not narrow yet.
    assert_eq!(ids(&app), [2, 3]);

    let loaded: Msg = Box::new(TypeLoadedMsg {
        store_id: app.categories.id(),
        category: "normal".into(),
        result: Ok(vec![item(3)]),
    });
    send(&mut app, loaded);
    assert_eq!(ids(&app), [3]);

    send(&mut app, key(KeyCode::Char('c')));
    assert_eq!(ids(&app), [1, 2, 3]);
    send(&mut app, key(KeyCode::Esc));
    assert!(!app.controls.is_open());
    assert_eq!(app.focus, Focus::Grid);
}

#[test]
fn clear_all_also_resets_sort_and_search() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 9);
    send(&mut app, msg);
    send(&mut app, key(KeyCode::Char('s')));
    send(&mut app, key(KeyCode::Char('/')));
    type_text(&mut app, "saur");
    send(&mut app, key(KeyCode::Enter));
    assert!(app.search.is_active());

    send(&mut app, key(KeyCode::Char('f')));
    send(&mut app, key(KeyCode::Char('c')));
    assert_eq!(app.controls.sort(), SortOption::IdAscending);
    assert!(!app.search.is_active());
    assert_eq!(app.search_input.value(), "");
    // The search superseded paging, so the listing starts over.
    assert!(app.controller.is_loading_initial());
}

#[test]
fn details_open_render_and_close() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);
    send(&mut app, key(KeyCode::Right));
    send(&mut app, key(KeyCode::Enter));
    assert_eq!(app.focus, Focus::Details(item(2)));
    assert!(screen(&app).contains("Loading details…"));

    let details = PokemonDetails {
        pokemon: Pokemon {
            id: 2,
            name: "ivysaur".into(),
            base_experience: Some(142),
            height: 10,
            weight: 130,
            abilities: Vec::new(),
            sprites: PokemonSprites::default(),
            stats: Vec::new(),
            types: Vec::new(),
        },
        species: None,
    };
    let loaded: Msg = Box::new(DetailLoadedMsg {
        store_id: app.details.id(),
        pokemon_id: 2,
        result: Ok(details),
    });
    send(&mut app, loaded);
    let out = screen(&app);
    assert!(out.contains("#002 Ivysaur"));
    assert!(out.contains("Height: 1.0 m"), "{out}");

    send(&mut app, key(KeyCode::Esc));
    assert_eq!(app.focus, Focus::Grid);
}

#[test]
fn details_step_through_the_visible_order() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);
    send(&mut app, key(KeyCode::Char('s')));
    assert_eq!(ids(&app), [3, 2, 1]);

    send(&mut app, key(KeyCode::Enter));
    assert_eq!(app.focus, Focus::Details(item(3)));
    let out = screen(&app);
    assert!(out.contains("#002 Ivysaur ›"), "{out}");
    assert!(!out.contains('‹'));

    // Already first: nothing to go back to.
    send(&mut app, key(KeyCode::Left));
    assert_eq!(app.focus, Focus::Details(item(3)));

    send(&mut app, key(KeyCode::Right));
    assert_eq!(app.focus, Focus::Details(item(2)));
    assert_eq!(app.grid.cursor(), 1);
    assert_eq!(app.details.get(2), Some(&DetailState::Loading));
    let out = screen(&app);
    assert!(out.contains("‹ #003 Venusaur"), "{out}");
    assert!(out.contains("#001 Bulbasaur ›"));

    send(&mut app, key(KeyCode::Char('l')));
    send(&mut app, key(KeyCode::Char('l')));
    assert_eq!(app.focus, Focus::Details(item(1)));
    assert_eq!(app.grid.cursor(), 2);

    send(&mut app, key(KeyCode::Esc));
    assert_eq!(app.selected_item(), Some(&item(1)));
}

#[test]
fn failed_details_can_be_retried() {
    let mut app = app();
    let msg = page(&app, RequestKind::Initial, 0, 3);
    send(&mut app, msg);
    send(&mut app, key(KeyCode::Enter));
    let failed: Msg = Box::new(DetailLoadedMsg {
        store_id: app.details.id(),
        pokemon_id: 1,
        result: Err(PokedexError::Status {
            endpoint: "pokemon/1".into(),
            status: 500,
        }),
    });
    send(&mut app, failed);
    assert!(screen(&app).contains("Press r to try again."));
    send(&mut app, key(KeyCode::Char('r')));
    assert_eq!(app.details.get(1), Some(&DetailState::Loading));
}

#[test]
fn resize_changes_the_column_count() {
    let mut app = app();
    send(&mut app, Box::new(WindowSizeMsg {
        width: 200,
        height: 40,
    }));
    assert_eq!(app.grid.columns(), 8);
    send(&mut app, Box::new(WindowSizeMsg {
        width: 30,
        height: 40,
    }));
    assert_eq!(app.grid.columns(), 1);
}

#[test]
fn quit_keys() {
    let mut app = app();
    assert!(send(&mut app, key(KeyCode::Char('q'))));
    send(&mut app, key(KeyCode::Char('/')));
    // In the search field q is just a letter.
    assert!(!send(&mut app, key(KeyCode::Char('q'))));
    assert!(send(&mut app, Box::new(KeyMsg {
        key: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
    })));
}

#[test]
fn launch_can_only_be_set_once() {
    let config = Config::default();
    let _ = set_launch(Launch::from_config(config.clone()));
    let again = set_launch(Launch::from_config(config));
    assert_eq!(again.map_err(|e| e.code()), Err("PDX-3900"));
}
