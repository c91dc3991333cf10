//! Wire types for the PokéAPI endpoints the viewer uses.
//!
//! Only the fields rendered by the UI are modeled; serde ignores the rest of
//! the (very large) upstream records.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::catalog::id::{extract_id, UNKNOWN_ID};

/// One entry of the paginated listing: a name plus a locator for its record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListItem {
    pub name: String,
    /// Opaque locator; its last path segment is the national dex number.
    #[serde(rename = "url")]
    pub reference: String,
}

impl ListItem {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }

    /// Numeric identifier recovered from `reference`, or [`UNKNOWN_ID`].
    #[must_use]
    pub fn id(&self) -> u32 {
        extract_id(&self.reference).unwrap_or(UNKNOWN_ID)
    }
}

/// `GET /pokemon?limit&offset` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<ListItem>,
}

/// A `{ name, url }` pair as used all over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonAbility {
    pub ability: NamedResource,
    pub is_hidden: bool,
    pub slot: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialArtwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: OfficialArtwork,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

/// `GET /pokemon/{id}` response body (subset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub base_experience: Option<u32>,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub sprites: PokemonSprites,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

impl Pokemon {
    /// Type names in slot order.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        let mut types: Vec<&PokemonType> = self.types.iter().collect();
        types.sort_by_key(|t| t.slot);
        types.into_iter().map(|t| t.kind.name.as_str()).collect()
    }

    /// Best available artwork URL.
    #[must_use]
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .other
            .official_artwork
            .front_default
            .as_deref()
            .or(self.sprites.front_default.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
    pub version: Option<NamedResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genus {
    pub genus: String,
    pub language: NamedResource,
}

/// `GET /pokemon-species/{id}` response body (subset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSpecies {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    pub generation: Option<NamedResource>,
    #[serde(default)]
    pub names: Vec<LocalizedName>,
    #[serde(default)]
    pub genera: Vec<Genus>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    pub pokemon: ListItem,
}

/// `GET /type/{name}` response body (subset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMembers {
    pub name: String,
    #[serde(default)]
    pub pokemon: Vec<TypeSlot>,
}

impl TypeMembers {
    #[must_use]
    pub fn items(&self) -> Vec<ListItem> {
        self.pokemon.iter().map(|slot| slot.pokemon.clone()).collect()
    }
}

/// A Pokémon record plus its species, as shown by the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonDetails {
    pub pokemon: Pokemon,
    /// `None` when the species lookup failed; the view degrades gracefully.
    pub species: Option<PokemonSpecies>,
}
