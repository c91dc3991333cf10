//! HTTP access to the PokéAPI.
//!
//! [`PokemonSource`] is the seam the controller and detail store depend on;
//! [`PokeApiClient`] is the reqwest-backed implementation. The client is
//! built explicitly from [`ApiConfig`] and shared behind an `Arc`, so tests
//! can inject a fake source.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::models::{ListItem, ListPage, Pokemon, PokemonSpecies, TypeMembers};
use crate::config::ApiConfig;
use crate::error::{PokedexError, Result};

/// Read-only access to the creature catalog.
#[async_trait]
pub trait PokemonSource: Send + Sync {
    /// One page of the listing, `limit` entries starting at `offset`.
    async fn list_page(&self, limit: usize, offset: usize) -> Result<ListPage>;

    /// Full record for a numeric id or a name.
    async fn pokemon(&self, id_or_name: &str) -> Result<Pokemon>;

    /// Species record (names, genera, flavor text) for a numeric id or a name.
    async fn species(&self, id_or_name: &str) -> Result<PokemonSpecies>;

    /// All entries of a given type (`fire`, `water`, ...).
    async fn pokemon_of_type(&self, type_name: &str) -> Result<Vec<ListItem>>;
}

/// Shared handle to a source.
pub type SharedSource = Arc<dyn PokemonSource>;

/// reqwest-backed [`PokemonSource`].
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base: Url,
}

impl PokeApiClient {
    /// Builds a client for `config.base_url` with `config.timeout_ms`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut raw = config.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| PokedexError::InvalidUrl {
            url: config.base_url.clone(),
            details: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pokedex-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PokedexError::Runtime {
                details: format!("could not build HTTP client: {e}"),
            })?;
        Ok(Self { http, base })
    }

    /// The normalized base URL (always ends with `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves an endpoint path against the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| PokedexError::InvalidUrl {
                url: format!("{}{}", self.base, endpoint),
                details: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PokedexError::from_reqwest(endpoint, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "non-success response");
            return Err(PokedexError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PokedexError::from_reqwest(endpoint, &e))?;
        serde_json::from_slice(&body).map_err(|e| PokedexError::Decode {
            endpoint: endpoint.to_string(),
            details: e.to_string(),
        })
    }
}

#[async_trait]
impl PokemonSource for PokeApiClient {
    async fn list_page(&self, limit: usize, offset: usize) -> Result<ListPage> {
        self.get_json(&format!("pokemon?limit={limit}&offset={offset}"))
            .await
    }

    async fn pokemon(&self, id_or_name: &str) -> Result<Pokemon> {
        self.get_json(&format!("pokemon/{}", normalize_key(id_or_name)))
            .await
    }

    async fn species(&self, id_or_name: &str) -> Result<PokemonSpecies> {
        self.get_json(&format!("pokemon-species/{}", normalize_key(id_or_name)))
            .await
    }

    async fn pokemon_of_type(&self, type_name: &str) -> Result<Vec<ListItem>> {
        let members: TypeMembers = self
            .get_json(&format!("type/{}", normalize_key(type_name)))
            .await?;
        Ok(members.items())
    }
}

/// Source used when no real client could be built: every call reports the
/// construction failure, so the UI shows it in its error panels.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    error: PokedexError,
}

impl UnavailableSource {
    /// A source whose every request fails with `error`.
    #[must_use]
    pub fn new(error: PokedexError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl PokemonSource for UnavailableSource {
    async fn list_page(&self, _limit: usize, _offset: usize) -> Result<ListPage> {
        Err(self.error.clone())
    }

    async fn pokemon(&self, _id_or_name: &str) -> Result<Pokemon> {
        Err(self.error.clone())
    }

    async fn species(&self, _id_or_name: &str) -> Result<PokemonSpecies> {
        Err(self.error.clone())
    }

    async fn pokemon_of_type(&self, _type_name: &str) -> Result<Vec<ListItem>> {
        Err(self.error.clone())
    }
}

// API keys are lowercase and never contain path separators.
fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace('/', "")
}
