//! Error types shared by the API client, configuration loader and UI.
//!
//! Every variant carries owned strings so errors can be cloned into
//! bubbletea messages and rendered later by the view.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, PokedexError>;

/// Top-level error type for the Pokédex viewer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PokedexError {
    /// A configuration value failed validation.
    #[error("[PDX-1001] invalid configuration: {details}")]
    InvalidConfig {
        /// What was wrong with the value.
        details: String,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("[PDX-1002] missing configuration file: {}", path.display())]
    MissingConfig {
        /// The path that was requested.
        path: PathBuf,
    },

    /// A configuration source could not be parsed.
    #[error("[PDX-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        /// Which source failed (`toml`, `env`, `cli`).
        context: &'static str,
        /// Parser message.
        details: String,
    },

    /// A filter value violated the number range invariant.
    #[error("[PDX-1101] invalid filter: {details}")]
    InvalidFilter {
        /// What was wrong with the filter.
        details: String,
    },

    /// A base URL or endpoint could not be built.
    #[error("[PDX-2001] invalid url {url}: {details}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser message.
        details: String,
    },

    /// The request never produced a response.
    #[error("[PDX-2002] request to {endpoint} failed: {details}")]
    Transport {
        /// Endpoint path relative to the base URL.
        endpoint: String,
        /// Transport error message.
        details: String,
    },

    /// The request exceeded the configured timeout.
    #[error("[PDX-2003] request to {endpoint} timed out")]
    Timeout {
        /// Endpoint path relative to the base URL.
        endpoint: String,
    },

    /// The server answered with a non-success status.
    #[error("[PDX-2004] {endpoint} returned HTTP {status}")]
    Status {
        /// Endpoint path relative to the base URL.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not match the expected shape.
    #[error("[PDX-2005] could not decode {endpoint} response: {details}")]
    Decode {
        /// Endpoint path relative to the base URL.
        endpoint: String,
        /// Decoder message.
        details: String,
    },

    /// Filesystem failure (config or log file).
    #[error("[PDX-3001] IO failure at {}: {details}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// OS error message.
        details: String,
    },

    /// Terminal runtime or subscriber setup failure.
    #[error("[PDX-3900] runtime failure: {details}")]
    Runtime {
        /// Runtime message.
        details: String,
    },
}

impl PokedexError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "PDX-1001",
            Self::MissingConfig { .. } => "PDX-1002",
            Self::ConfigParse { .. } => "PDX-1003",
            Self::InvalidFilter { .. } => "PDX-1101",
            Self::InvalidUrl { .. } => "PDX-2001",
            Self::Transport { .. } => "PDX-2002",
            Self::Timeout { .. } => "PDX-2003",
            Self::Status { .. } => "PDX-2004",
            Self::Decode { .. } => "PDX-2005",
            Self::Io { .. } => "PDX-3001",
            Self::Runtime { .. } => "PDX-3900",
        }
    }

    /// Whether a user-initiated retry might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Short message suitable for an error panel.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } => "Could not reach the PokéAPI.".to_string(),
            Self::Timeout { .. } => "The PokéAPI took too long to answer.".to_string(),
            Self::Status { status: 404, .. } => "Not found in the Pokédex.".to_string(),
            Self::Status { status, .. } => format!("The PokéAPI answered with HTTP {status}."),
            Self::Decode { .. } => "The PokéAPI sent data we could not read.".to_string(),
            other => other.to_string(),
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            details: source.to_string(),
        }
    }

    /// Classifies a reqwest failure for the given endpoint.
    #[must_use]
    pub fn from_reqwest(endpoint: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
        } else if error.is_decode() {
            Self::Decode {
                endpoint: endpoint.to_string(),
                details: error.to_string(),
            }
        } else {
            Self::Transport {
                endpoint: endpoint.to_string(),
                details: error.to_string(),
            }
        }
    }
}

impl From<toml::de::Error> for PokedexError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let err = PokedexError::Timeout {
            endpoint: "pokemon".into(),
        };
        assert_eq!(err.code(), "PDX-2003");
        assert!(err.to_string().starts_with("[PDX-2003]"));
    }

    #[test]
    fn retryable_classification() {
        let server = PokedexError::Status {
            endpoint: "pokemon".into(),
            status: 503,
        };
        let missing = PokedexError::Status {
            endpoint: "pokemon/99999".into(),
            status: 404,
        };
        assert!(server.is_retryable());
        assert!(!missing.is_retryable());
        assert!(!PokedexError::InvalidConfig {
            details: "x".into()
        }
        .is_retryable());
    }

    #[test]
    fn user_message_hides_endpoint_details() {
        let err = PokedexError::Transport {
            endpoint: "pokemon?limit=20&offset=0".into(),
            details: "dns error".into(),
        };
        assert_eq!(err.user_message(), "Could not reach the PokéAPI.");
    }
}
