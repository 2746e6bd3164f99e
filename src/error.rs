use std::path::PathBuf;

/// Errors that can occur while building a deck.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("requested {requested} pairs but only {available} distinct symbols are available")]
    InsufficientSymbols { requested: usize, available: usize },

    #[error("pair count must be >= 1")]
    InvalidPairCount,

    #[error("symbol source '{0}' provided no symbols")]
    EmptySymbolSource(String),
}

/// Errors reported by key-value stores. None of these are fatal: callers
/// fall back to in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error for key '{key}': {source}")]
    Json {
        key: String,
        source: serde_json::Error,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors returned by session operations that are not plain game input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("multiplayer needs between 2 and {max} players, got {got}")]
    InvalidPlayerCount { got: usize, max: usize },

    #[error("round is not finished")]
    NotFinished,

    #[error("leaderboard submission is only available in single-player mode")]
    NotSinglePlayer,

    #[error("score for this round was already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Deck(#[from] DeckError),
}
