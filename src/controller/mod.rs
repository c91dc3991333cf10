//! Page-fetch controller.
//!
//! [`PageController`] owns the accumulated listing and its [`LoaderState`].
//! Requests go out as bubbletea commands that resolve to a [`PageLoadedMsg`];
//! every request carries a generation number and only the response to the
//! latest issued request is applied. Activating a search bumps the generation
//! too, which is how a search supersedes an in-flight page.

use std::sync::atomic::{AtomicI64, Ordering};

use bubbletea_rs::{Cmd, Msg};

use crate::api::{ListItem, ListPage, SharedSource};
use crate::catalog::SearchTerm;
use crate::error::{PokedexError, Result};

#[cfg(test)]
mod tests;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Pagination bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoaderState {
    /// More entries exist beyond what has been fetched.
    pub has_more: bool,
    /// A load-more request is in flight.
    pub is_loading_more: bool,
    /// The loader is in its preparing phase.
    pub is_preparing: bool,
    /// Offset of the next page.
    pub next_offset: usize,
    /// Listing size reported by the first successful response.
    pub total_count: Option<u64>,
}

/// Which kind of page a request fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Offset zero; replaces the items.
    Initial,
    /// The next offset; appends.
    LoadMore,
}

/// One issued page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Initial or load-more.
    pub kind: RequestKind,
    /// First entry requested.
    pub offset: usize,
    /// Entries requested.
    pub limit: usize,
}

/// Response to a [`PageRequest`].
#[derive(Debug, Clone)]
pub struct PageLoadedMsg {
    /// Controller that issued the request.
    pub controller_id: i64,
    /// Generation the request was issued under.
    pub generation: u64,
    /// What was asked for.
    pub request: PageRequest,
    /// The page, or why it could not be fetched.
    pub result: Result<ListPage>,
}

/// The last request failed and waits for a user retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// The request to re-issue.
    pub request: PageRequest,
    /// Why it failed.
    pub error: PokedexError,
}

impl Failure {
    /// Whether the initial page or a later one failed.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.request.kind
    }
}

/// Owns the fetched listing and decides which page to request next.
pub struct PageController {
    id: i64,
    source: SharedSource,
    page_size: usize,
    items: Vec<ListItem>,
    revision: u64,
    state: LoaderState,
    loading_initial: bool,
    generation: u64,
    search: SearchTerm,
    failure: Option<Failure>,
}

impl std::fmt::Debug for PageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageController")
            .field("id", &self.id)
            .field("page_size", &self.page_size)
            .field("items", &self.items.len())
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl PageController {
    /// A controller with no items; call [`load_initial`](Self::load_initial)
    /// to start.
    #[must_use]
    pub fn new(source: SharedSource, page_size: usize) -> Self {
        Self {
            id: next_id(),
            source,
            page_size: page_size.max(1),
            items: Vec::new(),
            revision: 0,
            state: LoaderState::default(),
            loading_initial: false,
            generation: 0,
            search: SearchTerm::default(),
            failure: None,
        }
    }

    /// Instance id carried by this controller's messages.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Entries per request.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Everything fetched so far, in listing order.
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Bumped whenever [`items`](Self::items) changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Pagination state.
    #[must_use]
    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    /// Generation of the latest issued request.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Search term the controller is paging under.
    #[must_use]
    pub fn search(&self) -> &SearchTerm {
        &self.search
    }

    /// The failed request awaiting a retry, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Whether the first page is in flight.
    #[must_use]
    pub fn is_loading_initial(&self) -> bool {
        self.loading_initial
    }

    /// Whether any page is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading_initial || self.state.is_loading_more
    }

    /// Whether a failed load-more waits for a user retry.
    #[must_use]
    pub fn pending_load_more(&self) -> bool {
        self.failure
            .as_ref()
            .is_some_and(|f| f.kind() == RequestKind::LoadMore)
    }

    /// Whether the loader should keep watching the end of the list.
    #[must_use]
    pub fn loader_has_more(&self) -> bool {
        self.state.has_more && !self.search.is_active() && self.failure.is_none()
    }

    /// Mirrors the loader's preparing phase for rendering.
    pub fn set_preparing(&mut self, preparing: bool) {
        self.state.is_preparing = preparing;
    }

    /// Fetches the first page. Items are replaced when it arrives.
    pub fn load_initial(&mut self) -> Cmd {
        self.loading_initial = true;
        self.state.is_loading_more = false;
        self.failure = None;
        self.issue(PageRequest {
            kind: RequestKind::Initial,
            offset: 0,
            limit: self.page_size,
        })
    }

    /// Fetches the next page, unless something rules it out: a load already
    /// in flight, nothing more to load, an active search, or an unretried
    /// failure.
    pub fn load_more(&mut self) -> Option<Cmd> {
        if self.is_loading() {
            tracing::trace!(target: "pokedex::controller", "load more ignored: already loading");
            return None;
        }
        if !self.loader_has_more() {
            tracing::trace!(target: "pokedex::controller", "load more ignored: nothing to load");
            return None;
        }
        self.state.is_loading_more = true;
        Some(self.issue(PageRequest {
            kind: RequestKind::LoadMore,
            offset: self.state.next_offset,
            limit: self.page_size,
        }))
    }

    /// Re-issues the failed request with the same offset.
    ///
    /// A failed load-more stays pending while a search is active; clearing
    /// the search starts over from the first page instead.
    pub fn retry(&mut self) -> Option<Cmd> {
        if self.search.is_active() && self.pending_load_more() {
            tracing::trace!(target: "pokedex::controller", "retry ignored: search active");
            return None;
        }
        let failure = self.failure.take()?;
        match failure.request.kind {
            RequestKind::Initial => self.loading_initial = true,
            RequestKind::LoadMore => self.state.is_loading_more = true,
        }
        tracing::info!(
            target: "pokedex::controller",
            offset = failure.request.offset,
            code = failure.error.code(),
            "retrying page"
        );
        Some(self.issue(failure.request))
    }

    /// Updates the search term.
    ///
    /// Activating a search discards whatever page is in flight. Clearing an
    /// active search starts over from the first page.
    pub fn set_search(&mut self, term: SearchTerm) -> Option<Cmd> {
        let was_active = self.search.is_active();
        self.search = term;
        match (was_active, self.search.is_active()) {
            (false, true) => {
                if self.is_loading() {
                    self.generation += 1;
                    self.loading_initial = false;
                    self.state.is_loading_more = false;
                    tracing::debug!(
                        target: "pokedex::controller",
                        generation = self.generation,
                        "search superseded in-flight page"
                    );
                }
                None
            }
            (true, false) => Some(self.load_initial()),
            _ => None,
        }
    }

    fn issue(&mut self, request: PageRequest) -> Cmd {
        self.generation += 1;
        let generation = self.generation;
        let controller_id = self.id;
        let source = self.source.clone();
        tracing::debug!(
            target: "pokedex::controller",
            offset = request.offset,
            limit = request.limit,
            generation,
            "requesting page"
        );
        Box::pin(async move {
            let result = source.list_page(request.limit, request.offset).await;
            Some(Box::new(PageLoadedMsg {
                controller_id,
                generation,
                request,
                result,
            }) as Msg)
        })
    }

    /// Applies a page response. Returns `false` when the message is not for
    /// this controller or belongs to a superseded request.
    pub fn on_page_loaded(&mut self, msg: &PageLoadedMsg) -> bool {
        if msg.controller_id != self.id {
            return false;
        }
        if msg.generation != self.generation {
            tracing::debug!(
                target: "pokedex::controller",
                stale = msg.generation,
                current = self.generation,
                "discarding stale page"
            );
            return false;
        }

        self.loading_initial = false;
        self.state.is_loading_more = false;

        match &msg.result {
            Ok(page) => {
                if msg.request.kind == RequestKind::Initial {
                    self.items = page.results.clone();
                } else {
                    self.items.extend(page.results.iter().cloned());
                }
                self.revision += 1;
                self.state.total_count = Some(page.count);
                self.state.next_offset = msg.request.offset + msg.request.limit;
                self.state.has_more = page.results.len() == msg.request.limit
                    && (self.items.len() as u64) < page.count;
                self.failure = None;
                tracing::info!(
                    target: "pokedex::controller",
                    received = page.results.len(),
                    total = self.items.len(),
                    has_more = self.state.has_more,
                    "page loaded"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: "pokedex::controller",
                    offset = msg.request.offset,
                    code = error.code(),
                    %error,
                    "page request failed"
                );
                self.failure = Some(Failure {
                    request: msg.request,
                    error: error.clone(),
                });
            }
        }
        true
    }
}
