#![warn(missing_docs)]

//! # pokedex-tui
//!
//! A terminal Pokédex built on [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//! It pages through the [PokéAPI](https://pokeapi.co) listing, loads more as
//! the card grid nears its end, and lets you search, filter and sort what has
//! been fetched so far.
//!
//! ## Layout
//!
//! - [`api`]: the [`PokemonSource`](api::PokemonSource) seam, its reqwest
//!   client and the wire models
//! - [`catalog`]: pure listing logic (id extraction, filters, sorting, name
//!   search and the memoized view pipeline)
//! - [`controller`]: page fetching with stale-response protection
//! - [`loader`]: the sentinel observer behind infinite scroll
//! - [`details`] / [`categories`]: per-creature records and type membership
//! - [`ui`] and [`app`]: screen components and the bubbletea program
//!
//! ## Pipeline
//!
//! ```rust
//! use pokedex_tui::api::ListItem;
//! use pokedex_tui::catalog::{derive_view, FilterState, SearchTerm, SortOption};
//!
//! let items = vec![
//!     ListItem::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
//!     ListItem::new("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/"),
//! ];
//! let view = derive_view(
//!     &items,
//!     &FilterState::new(1010),
//!     SortOption::NameDescending,
//!     &SearchTerm::new("SAUR"),
//!     None,
//! );
//! assert_eq!(view[0].name, "ivysaur");
//! ```
//!
//! ## Running
//!
//! ```rust,no_run
//! use bubbletea_rs::Program;
//! use pokedex_tui::app::{set_launch, App, Launch};
//! use pokedex_tui::config::Config;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! set_launch(Launch::from_config(Config::load(None)?))?;
//! let program = Program::<App>::builder().alt_screen(true).build()?;
//! program.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod details;
pub mod error;
pub mod help;
pub mod key;
pub mod loader;
pub mod logging;
pub mod spinner;
pub mod ui;

pub use app::{set_launch, App, Launch};
pub use config::Config;
pub use error::{PokedexError, Result};

/// The types most callers need.
pub mod prelude {
    pub use crate::api::{ListItem, PokeApiClient, PokemonSource, SharedSource};
    pub use crate::app::{set_launch, App, Launch};
    pub use crate::catalog::{
        derive_view, FilterState, NumberRange, SearchTerm, SortOption, ViewModel,
    };
    pub use crate::config::Config;
    pub use crate::controller::{LoaderState, PageController};
    pub use crate::error::{PokedexError, Result};
    pub use crate::loader::{Loader, LoaderOptions};
}
