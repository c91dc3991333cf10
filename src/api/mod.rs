//! PokéAPI client, wire models and display formatting.

pub mod client;
pub mod format;
pub mod models;

pub use client::{PokeApiClient, PokemonSource, SharedSource, UnavailableSource};
pub use models::{ListItem, ListPage, Pokemon, PokemonDetails, PokemonSpecies};
