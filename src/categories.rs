//! Type membership fetched on demand.
//!
//! Selecting a type in the filter panel requests `GET /type/{name}` once; the
//! result feeds a [`TypeIndex`], which the pipeline consults through
//! [`CategoryLookup`]. Until a type's membership arrives it does not narrow
//! the view.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use bubbletea_rs::{Cmd, Msg};

use crate::api::{ListItem, SharedSource};
use crate::catalog::{CategoryLookup, TypeIndex};
use crate::error::{PokedexError, Result};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Response to a membership request.
#[derive(Debug, Clone)]
pub struct TypeLoadedMsg {
    /// Store the response is addressed to.
    pub store_id: i64,
    /// Type name.
    pub category: String,
    /// Members of the type, or why they could not be fetched.
    pub result: Result<Vec<ListItem>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fetch {
    /// Request in flight.
    Loading,
    /// The request failed.
    Failed(PokedexError),
}

/// Owns the [`TypeIndex`] and the fetches that fill it.
pub struct CategoryStore {
    id: i64,
    source: SharedSource,
    index: TypeIndex,
    fetches: HashMap<String, Fetch>,
}

impl std::fmt::Debug for CategoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryStore")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("fetches", &self.fetches)
            .finish_non_exhaustive()
    }
}

impl CategoryStore {
    /// An empty store fetching through `source`.
    #[must_use]
    pub fn new(source: SharedSource) -> Self {
        Self {
            id: next_id(),
            source,
            index: TypeIndex::new(),
            fetches: HashMap::new(),
        }
    }

    /// Instance id carried by this store's messages.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Memberships fetched so far.
    #[must_use]
    pub fn index(&self) -> &TypeIndex {
        &self.index
    }

    /// The lookup to hand to the pipeline.
    #[must_use]
    pub fn lookup(&self) -> &dyn CategoryLookup {
        &self.index
    }

    /// Whether `category` is being fetched.
    #[must_use]
    pub fn is_loading(&self, category: &str) -> bool {
        matches!(self.fetches.get(category), Some(Fetch::Loading))
    }

    /// Why `category` could not be fetched, if it failed.
    #[must_use]
    pub fn error(&self, category: &str) -> Option<&PokedexError> {
        match self.fetches.get(category) {
            Some(Fetch::Failed(error)) => Some(error),
            _ => None,
        }
    }

    /// Fetches membership for `category` unless it is known or in flight.
    /// A failed category is fetched again.
    pub fn request(&mut self, category: &str) -> Option<Cmd> {
        if self.index.contains_category(category) || self.is_loading(category) {
            return None;
        }
        self.fetches.insert(category.to_string(), Fetch::Loading);
        let store_id = self.id;
        let source = self.source.clone();
        let category = category.to_string();
        tracing::debug!(target: "pokedex::categories", %category, "requesting type members");
        let cmd: Cmd = Box::pin(async move {
            let result = source.pokemon_of_type(&category).await;
            Some(Box::new(TypeLoadedMsg {
                store_id,
                category,
                result,
            }) as Msg)
        });
        Some(cmd)
    }

    /// Stores a membership response. Returns `false` for foreign messages.
    pub fn on_loaded(&mut self, msg: &TypeLoadedMsg) -> bool {
        if msg.store_id != self.id {
            return false;
        }
        match &msg.result {
            Ok(items) => {
                self.fetches.remove(&msg.category);
                self.index.insert(&msg.category, items);
            }
            Err(error) => {
                tracing::warn!(
                    target: "pokedex::categories",
                    category = %msg.category,
                    code = error.code(),
                    "type lookup failed"
                );
                self.fetches
                    .insert(msg.category.clone(), Fetch::Failed(error.clone()));
            }
        }
        true
    }
}
