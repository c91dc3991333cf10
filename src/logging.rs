//! Tracing subscriber setup.
//!
//! The terminal is owned by the UI, so log lines go to a file. When no file
//! is configured no subscriber is installed and the `tracing` macros are
//! no-ops.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::Level;

use crate::config::LoggingConfig;
use crate::error::{PokedexError, Result};

/// Installs the global fmt subscriber described by `config`.
///
/// Returns `Ok(false)` when logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    let Some(path) = config.file.as_ref() else {
        return Ok(false);
    };

    let level = parse_level(&config.level)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PokedexError::io(path, &e))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| PokedexError::Runtime {
            details: format!("could not install log subscriber: {e}"),
        })?;

    tracing::info!(path = %path.display(), %level, "logging initialized");
    Ok(true)
}

fn parse_level(raw: &str) -> Result<Level> {
    raw.trim()
        .parse::<Level>()
        .map_err(|_| PokedexError::InvalidConfig {
            details: format!("unknown log level {raw:?}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_file() {
        let cfg = LoggingConfig::default();
        assert!(!init(&cfg).unwrap());
    }

    #[test]
    fn level_parsing_is_case_insensitive() {
        assert_eq!(parse_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_level(" warn ").unwrap(), Level::WARN);
        assert!(parse_level("chatty").is_err());
    }
}
