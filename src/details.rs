//! Per-creature detail records.
//!
//! Each id is fetched at most once unless its fetch failed and the user asks
//! for a retry. A failure is stored against its id only; other cards and the
//! list are unaffected.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use bubbletea_rs::{Cmd, Msg};

use crate::api::{PokemonDetails, SharedSource};
use crate::error::{PokedexError, Result};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Fetch status of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Request in flight.
    Loading,
    /// Record and species data are here.
    Loaded(Box<PokemonDetails>),
    /// The Pokémon record could not be fetched.
    Failed(PokedexError),
}

/// Result of a detail fetch.
#[derive(Debug, Clone)]
pub struct DetailLoadedMsg {
    /// Store the response is addressed to.
    pub store_id: i64,
    /// Creature the record belongs to.
    pub pokemon_id: u32,
    /// The combined record, or the fetch error.
    pub result: Result<PokemonDetails>,
}

/// Detail cache keyed by national dex number.
pub struct DetailStore {
    id: i64,
    source: SharedSource,
    states: HashMap<u32, DetailState>,
}

impl std::fmt::Debug for DetailStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailStore")
            .field("id", &self.id)
            .field("entries", &self.states.len())
            .finish_non_exhaustive()
    }
}

impl DetailStore {
    /// An empty store fetching through `source`.
    #[must_use]
    pub fn new(source: SharedSource) -> Self {
        Self {
            id: next_id(),
            source,
            states: HashMap::new(),
        }
    }

    /// Instance id carried by this store's messages.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// State of the record for `pokemon_id`; `None` if never requested.
    #[must_use]
    pub fn get(&self, pokemon_id: u32) -> Option<&DetailState> {
        self.states.get(&pokemon_id)
    }

    /// The loaded record, if any.
    #[must_use]
    pub fn details(&self, pokemon_id: u32) -> Option<&PokemonDetails> {
        match self.states.get(&pokemon_id) {
            Some(DetailState::Loaded(details)) => Some(&**details),
            _ => None,
        }
    }

    /// Starts a fetch unless one is running or the record is already here.
    /// Failed ids are left alone; see [`retry`](Self::retry).
    pub fn request(&mut self, pokemon_id: u32) -> Option<Cmd> {
        if self.states.contains_key(&pokemon_id) {
            return None;
        }
        Some(self.fetch(pokemon_id))
    }

    /// Re-issues a failed fetch.
    pub fn retry(&mut self, pokemon_id: u32) -> Option<Cmd> {
        match self.states.get(&pokemon_id) {
            Some(DetailState::Failed(_)) => Some(self.fetch(pokemon_id)),
            _ => None,
        }
    }

    fn fetch(&mut self, pokemon_id: u32) -> Cmd {
        self.states.insert(pokemon_id, DetailState::Loading);
        let store_id = self.id;
        let source = self.source.clone();
        tracing::debug!(target: "pokedex::details", pokemon_id, "requesting details");
        Box::pin(async move {
            let key = pokemon_id.to_string();
            let result = match source.pokemon(&key).await {
                Ok(pokemon) => {
                    // Species data only adds text; without it the card still renders.
                    let species = match source.species(&key).await {
                        Ok(species) => Some(species),
                        Err(error) => {
                            tracing::debug!(
                                target: "pokedex::details",
                                pokemon_id,
                                code = error.code(),
                                "species unavailable"
                            );
                            None
                        }
                    };
                    Ok(PokemonDetails { pokemon, species })
                }
                Err(error) => Err(error),
            };
            Some(Box::new(DetailLoadedMsg {
                store_id,
                pokemon_id,
                result,
            }) as Msg)
        })
    }

    /// Stores a fetch result. Returns `false` for messages from other stores.
    pub fn on_loaded(&mut self, msg: &DetailLoadedMsg) -> bool {
        if msg.store_id != self.id {
            return false;
        }
        let state = match &msg.result {
            Ok(details) => DetailState::Loaded(Box::new(details.clone())),
            Err(error) => {
                tracing::warn!(
                    target: "pokedex::details",
                    pokemon_id = msg.pokemon_id,
                    code = error.code(),
                    %error,
                    "detail request failed"
                );
                DetailState::Failed(error.clone())
            }
        };
        self.states.insert(msg.pokemon_id, state);
        true
    }
}
