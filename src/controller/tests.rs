use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bubbletea_rs::Cmd;

use super::*;
use crate::api::{ListPage, Pokemon, PokemonSource, PokemonSpecies};
use crate::catalog::{derive_view, FilterState, SortOption};
use crate::loader::{Loader, LoaderOptions, ScrollMetrics, Trigger};

/// Listing of `count` numbered entries. Requests are recorded in call order;
/// `fail_next` makes the next N requests fail with a transport error.
struct FakeSource {
    count: u64,
    names: Vec<String>,
    calls: Mutex<Vec<(usize, usize)>>,
    fail_next: Mutex<usize>,
}

impl FakeSource {
    fn numbered(count: u64) -> Arc<Self> {
        Arc::new(Self {
            count,
            names: Vec::new(),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(0),
        })
    }

    fn named(names: &[&str], count: u64) -> Arc<Self> {
        Arc::new(Self {
            count,
            names: names.iter().map(|n| (*n).to_string()).collect(),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(0),
        })
    }

    fn fail_next(&self, n: usize) {
        *self.fail_next.lock().unwrap() = n;
    }

    fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PokemonSource for FakeSource {
    async fn list_page(&self, limit: usize, offset: usize) -> Result<ListPage> {
        self.calls.lock().unwrap().push((limit, offset));
        {
            let mut fail = self.fail_next.lock().unwrap();
            if *fail > 0 {
                *fail -= 1;
                return Err(PokedexError::Transport {
                    endpoint: "pokemon".into(),
                    details: "connection reset".into(),
                });
            }
        }
        let end = (offset + limit).min(self.count as usize);
        let results = (offset..end)
            .map(|i| {
                let name = self
                    .names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("mon{}", i + 1));
                ListItem::new(name, format!("https://pokeapi.co/api/v2/pokemon/{}/", i + 1))
            })
            .collect();
        Ok(ListPage {
            count: self.count,
            next: None,
            previous: None,
            results,
        })
    }

    async fn pokemon(&self, id_or_name: &str) -> Result<Pokemon> {
        Err(PokedexError::Status {
            endpoint: format!("pokemon/{id_or_name}"),
            status: 404,
        })
    }

    async fn species(&self, id_or_name: &str) -> Result<PokemonSpecies> {
        Err(PokedexError::Status {
            endpoint: format!("pokemon-species/{id_or_name}"),
            status: 404,
        })
    }

    async fn pokemon_of_type(&self, _type_name: &str) -> Result<Vec<ListItem>> {
        Ok(Vec::new())
    }
}

async fn resolve(cmd: Cmd) -> PageLoadedMsg {
    let msg = cmd.await.expect("command yields a message");
    msg.downcast_ref::<PageLoadedMsg>()
        .expect("PageLoadedMsg")
        .clone()
}

async fn loaded(controller: &mut PageController, cmd: Cmd) -> bool {
    let msg = resolve(cmd).await;
    controller.on_page_loaded(&msg)
}

fn sentinel_visible() -> ScrollMetrics {
    ScrollMetrics {
        offset: 0,
        viewport_height: 24,
        content_height: 5,
        sentinel_row: Some(4),
    }
}

fn sync_loader(loader: &mut Loader, controller: &PageController) {
    loader.set_state(controller.loader_has_more(), controller.is_loading());
}

/// Runs the loader against the current layout; `Some` when it asks for more
/// and the controller accepted.
fn scroll(loader: &mut Loader, controller: &mut PageController) -> Option<Cmd> {
    let fire = match loader.evaluate(&sentinel_visible()) {
        Trigger::Fire => true,
        Trigger::Prepare => {
            let done = loader.prepare_done_msg();
            loader.finish_preparing(&done)
        }
        Trigger::Ignore => false,
    };
    if !fire {
        return None;
    }
    let cmd = controller.load_more();
    sync_loader(loader, controller);
    cmd
}

#[tokio::test]
async fn initial_page_then_exactly_one_load_more() {
    let source = FakeSource::numbered(1010);
    let mut controller = PageController::new(source.clone(), 3);
    let mut loader = Loader::new(LoaderOptions::default());

    let cmd = controller.load_initial();
    assert!(controller.is_loading_initial());
    assert!(loaded(&mut controller, cmd).await);
    assert_eq!(controller.items().len(), 3);
    assert!(controller.state().has_more);
    assert_eq!(controller.state().total_count, Some(1010));
    sync_loader(&mut loader, &controller);

    let more = scroll(&mut loader, &mut controller).expect("first scroll loads more");
    // A second rapid scroll before the first page resolves does nothing.
    assert!(scroll(&mut loader, &mut controller).is_none());
    assert!(controller.load_more().is_none());

    assert!(loaded(&mut controller, more).await);
    assert_eq!(source.calls(), vec![(3, 0), (3, 3)]);
    assert_eq!(controller.items().len(), 6);
    assert_eq!(controller.state().next_offset, 6);
}

#[tokio::test]
async fn unmatched_search_is_empty_not_an_error() {
    let source = FakeSource::named(&["bulbasaur", "ivysaur", "venusaur"], 3);
    let mut controller = PageController::new(source, 20);
    let cmd = controller.load_initial();
    assert!(loaded(&mut controller, cmd).await);

    assert!(controller.set_search(SearchTerm::new("pikachu")).is_none());
    let view = derive_view(
        controller.items(),
        &FilterState::new(1010),
        SortOption::default(),
        controller.search(),
        None,
    );
    assert!(view.is_empty());
    assert!(controller.failure().is_none());
    assert!(!controller.loader_has_more());
}

#[tokio::test]
async fn stale_responses_are_discarded() {
    let source = FakeSource::numbered(1010);
    let mut controller = PageController::new(source, 20);
    let first = controller.load_initial();
    let second = controller.load_initial();

    let late = resolve(first).await;
    let fresh = resolve(second).await;
    assert!(controller.on_page_loaded(&fresh));
    assert!(!controller.on_page_loaded(&late));
    assert_eq!(controller.revision(), 1);
}

#[tokio::test]
async fn messages_for_other_controllers_are_ignored() {
    let source = FakeSource::numbered(1010);
    let mut a = PageController::new(source.clone(), 20);
    let mut b = PageController::new(source, 20);
    let cmd = a.load_initial();
    let _ = b.load_initial();
    let msg = resolve(cmd).await;
    assert!(!b.on_page_loaded(&msg));
    assert!(a.on_page_loaded(&msg));
}

#[tokio::test]
async fn search_supersedes_in_flight_page() {
    let source = FakeSource::numbered(1010);
    let mut controller = PageController::new(source, 20);
    let cmd = controller.load_initial();
    assert!(loaded(&mut controller, cmd).await);

    let more = controller.load_more().expect("load more");
    assert!(controller.set_search(SearchTerm::new("mon1")).is_none());
    assert!(!controller.is_loading());
    assert!(controller.load_more().is_none());

    assert!(!loaded(&mut controller, more).await);
    assert_eq!(controller.items().len(), 20);

    // Clearing the search starts over from the first page.
    let fresh = controller
        .set_search(SearchTerm::default())
        .expect("fresh initial load");
    let msg = resolve(fresh).await;
    assert_eq!(msg.request.kind, RequestKind::Initial);
    assert_eq!(msg.request.offset, 0);
    assert!(controller.on_page_loaded(&msg));
}

#[tokio::test]
async fn changing_an_active_search_issues_nothing() {
    let source = FakeSource::numbered(1010);
    let mut controller = PageController::new(source.clone(), 20);
    assert!(controller.set_search(SearchTerm::new("pika")).is_none());
    assert!(controller.set_search(SearchTerm::new("pikachu")).is_none());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn load_more_failure_keeps_items_and_retries_same_offset() {
    let source = FakeSource::numbered(1010);
    let mut controller = PageController::new(source.clone(), 20);
    let cmd = controller.load_initial();
    assert!(loaded(&mut controller, cmd).await);

    source.fail_next(1);
    let more = controller.load_more().expect("load more");
    assert!(loaded(&mut controller, more).await);
    assert_eq!(controller.items().len(), 20);
    let failure = controller.failure().expect("failure recorded");
    assert_eq!(failure.kind(), RequestKind::LoadMore);
    assert!(failure.error.is_retryable());

    // Automatic triggers are blocked until the user retries.
    assert!(!controller.loader_has_more());
    assert!(controller.load_more().is_none());

    let retry = controller.retry().expect("retry");
    assert!(controller.retry().is_none());
    assert!(loaded(&mut controller, retry).await);
    assert_eq!(source.calls(), vec![(20, 0), (20, 20), (20, 20)]);
    assert_eq!(controller.items().len(), 40);
    assert!(controller.failure().is_none());
}

#[tokio::test]
async fn failed_load_more_is_not_retried_during_a_search() {
    let source = FakeSource::numbered(1010);
    let mut controller = PageController::new(source.clone(), 20);
    let cmd = controller.load_initial();
    assert!(loaded(&mut controller, cmd).await);

    source.fail_next(1);
    let more = controller.load_more().expect("load more");
    assert!(loaded(&mut controller, more).await);
    assert!(controller.pending_load_more());

    assert!(controller.set_search(SearchTerm::new("mon1")).is_none());
    assert!(controller.retry().is_none());
    assert!(!controller.is_loading());
    assert_eq!(source.calls(), vec![(20, 0), (20, 20)]);
    assert_eq!(controller.items().len(), 20);

    // Clearing the search reloads from the start and drops the failure.
    let fresh = controller
        .set_search(SearchTerm::default())
        .expect("fresh initial load");
    assert!(controller.failure().is_none());
    assert!(loaded(&mut controller, fresh).await);
    assert_eq!(source.calls(), vec![(20, 0), (20, 20), (20, 0)]);
}

#[tokio::test]
async fn initial_failure_can_be_retried() {
    let source = FakeSource::numbered(1010);
    source.fail_next(1);
    let mut controller = PageController::new(source, 20);
    let cmd = controller.load_initial();
    assert!(loaded(&mut controller, cmd).await);
    assert_eq!(
        controller.failure().map(Failure::kind),
        Some(RequestKind::Initial)
    );
    assert!(!controller.is_loading());

    let retry = controller.retry().expect("retry");
    assert!(controller.is_loading_initial());
    assert!(loaded(&mut controller, retry).await);
    assert_eq!(controller.items().len(), 20);
}

#[tokio::test]
async fn has_more_stops_at_short_page_or_total() {
    let source = FakeSource::numbered(25);
    let mut controller = PageController::new(source, 20);
    let cmd = controller.load_initial();
    assert!(loaded(&mut controller, cmd).await);
    assert!(controller.state().has_more);

    let more = controller.load_more().expect("load more");
    assert!(loaded(&mut controller, more).await);
    assert_eq!(controller.items().len(), 25);
    assert!(!controller.state().has_more);
    assert!(controller.load_more().is_none());

    let exact = FakeSource::numbered(20);
    let mut controller = PageController::new(exact, 20);
    let cmd = controller.load_initial();
    assert!(loaded(&mut controller, cmd).await);
    assert!(!controller.state().has_more);
}
