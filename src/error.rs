use std::path::PathBuf;

use thiserror::Error;

use crate::session::Status;

/// Errors reported by the session engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown puzzle `{id}`")]
    UnknownPuzzle { id: String },
    #[error("cannot {operation} while the session is {status}")]
    InvalidTransition {
        operation: &'static str,
        status: Status,
    },
    #[error("guess is empty")]
    EmptyGuess,
    #[error("no result to share yet, the session is {status}")]
    NotFinished { status: Status },
}

impl GameError {
    pub(crate) fn invalid(operation: &'static str, status: Status) -> Self {
        Self::InvalidTransition { operation, status }
    }
}

/// Errors raised while loading the puzzle catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("embedded catalog `{0}` is missing")]
    MissingEmbedded(&'static str),
    #[error("catalog does not contain any puzzles")]
    Empty,
    #[error("puzzle `{id}` has an empty answer")]
    EmptyAnswer { id: String },
    #[error("puzzle `{id}` must have at least one clip")]
    ZeroClips { id: String },
}
