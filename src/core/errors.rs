use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No usable rows found in {0}")]
    NoRecords(String),

    #[error("Speech error: {0}")]
    Speech(String),
}

impl From<std::io::Error> for DeckError {
    fn from(error: std::io::Error) -> Self {
        DeckError::Io(Box::new(error))
    }
}

/// Precondition failures for cursor moves. These are never fatal; callers
/// check `has_next`/`has_previous` first or treat the error as a no-op.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    #[error("already at the first card")]
    AtStart,

    #[error("already at the last card")]
    AtEnd,

    #[error("the deck is empty")]
    Empty,
}
