//! Configuration: TOML file + `POKEDEX_*` env overrides + defaults.
//!
//! Loading order is file, then environment, then validation. Command-line
//! flags are applied by the binary on top of the loaded value.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PokedexError, Result};
use crate::loader::ObserveMode;

/// Full viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    /// Upstream API settings.
    pub api: ApiConfig,
    /// Listing and catalog settings.
    pub list: ListConfig,
    /// Infinite-scroll trigger settings.
    pub loader: LoaderConfig,
    /// Search box settings.
    pub search: SearchConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Where the PokéAPI lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pokeapi.co/api/v2".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Page size and the upper bound of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: usize,
    /// Highest national dex number the number-range filter accepts.
    pub catalog_max: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            catalog_max: 1010,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Card rows of margin around the viewport in which the sentinel counts
    /// as visible.
    pub threshold_rows: usize,
    pub prepare_delay_ms: u64,
    /// `intersection` watches the sentinel row; `scroll-events` compares the
    /// content left below the viewport and skips the preparing phase.
    pub mode: ObserveMode,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            threshold_rows: 8,
            prepare_delay_ms: 150,
            mode: ObserveMode::Intersection,
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub fn prepare_delay(&self) -> Duration {
        Duration::from_millis(self.prepare_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    /// How many "did you mean" names to offer when a search finds nothing.
    pub max_suggestions: usize,
    /// Preferred language for species descriptions; English is the fallback.
    pub description_language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            max_suggestions: 3,
            description_language: "en".to_string(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Log level and destination. Without a file, logging is off because the
/// terminal belongs to the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Default configuration path (`$XDG_CONFIG_HOME/pokedex/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(explicit) = env_var("POKEDEX_CONFIG") {
            return PathBuf::from(explicit);
        }
        let base = env::var_os("XDG_CONFIG_HOME").map_or_else(
            || {
                env::var_os("HOME")
                    .map_or_else(|| PathBuf::from("."), PathBuf::from)
                    .join(".config")
            },
            PathBuf::from,
        );
        base.join("pokedex").join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// A missing file at the default path is not an error; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw =
                fs::read_to_string(&path_buf).map_err(|e| PokedexError::io(&path_buf, &e))?;
            Self::from_toml_str(&raw)?
        } else if path.is_some() {
            return Err(PokedexError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_overrides_with(env_var)?;
        cfg.validate()?;
        tracing::debug!(path = %path_buf.display(), "configuration loaded");
        Ok(cfg)
    }

    /// Parses a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `POKEDEX_*` overrides read through `lookup`.
    pub fn apply_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("POKEDEX_BASE_URL") {
            self.api.base_url = raw;
        }
        set_parsed(&lookup, "POKEDEX_TIMEOUT_MS", &mut self.api.timeout_ms)?;
        set_parsed(&lookup, "POKEDEX_PAGE_SIZE", &mut self.list.page_size)?;
        set_parsed(&lookup, "POKEDEX_CATALOG_MAX", &mut self.list.catalog_max)?;
        set_parsed(
            &lookup,
            "POKEDEX_LOADER_THRESHOLD",
            &mut self.loader.threshold_rows,
        )?;
        set_parsed(
            &lookup,
            "POKEDEX_PREPARE_DELAY_MS",
            &mut self.loader.prepare_delay_ms,
        )?;
        set_parsed(&lookup, "POKEDEX_LOADER_MODE", &mut self.loader.mode)?;
        set_parsed(&lookup, "POKEDEX_SEARCH_DEBOUNCE_MS", &mut self.search.debounce_ms)?;
        if let Some(raw) = lookup("POKEDEX_LANGUAGE") {
            self.search.description_language = raw;
        }
        if let Some(raw) = lookup("POKEDEX_LOG_LEVEL") {
            self.logging.level = raw;
        }
        if let Some(raw) = lookup("POKEDEX_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(raw));
        }
        Ok(())
    }

    /// Checks the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.api.base_url).map_err(|e| PokedexError::InvalidUrl {
            url: self.api.base_url.clone(),
            details: e.to_string(),
        })?;
        if self.api.timeout_ms == 0 {
            return Err(invalid("api.timeout_ms must be greater than zero"));
        }
        if self.list.page_size == 0 {
            return Err(invalid("list.page_size must be greater than zero"));
        }
        if self.list.catalog_max == 0 {
            return Err(invalid("list.catalog_max must be at least 1"));
        }
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(invalid(&format!(
                "logging.level {:?} is not one of trace, debug, info, warn, error",
                self.logging.level
            )));
        }
        Ok(())
    }
}

fn invalid(details: &str) -> PokedexError {
    PokedexError::InvalidConfig {
        details: details.to_string(),
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_parsed<F, T>(lookup: &F, name: &str, slot: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        *slot = raw.trim().parse::<T>().map_err(|error| PokedexError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}
