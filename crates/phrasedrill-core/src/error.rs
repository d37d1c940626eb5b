//! Drill error types.
//!
//! One variant per failure category the drill distinguishes. Item-local
//! content errors are separated from load-fatal ones so the corpus loader
//! can reject a single bad entry without aborting the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for core drill operations.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors raised by the item store, record store, questions and scheduler.
#[derive(Debug, Error)]
pub enum DrillError {
    /// A corpus entry is malformed, misses a required field, or its id
    /// collides with an entry of another type.
    #[error("corpus format error ({kind} '{id}'): {message}")]
    CorpusFormat {
        kind: String,
        id: String,
        message: String,
    },

    /// The corpus file could not be read.
    #[error("cannot read corpus {}: {message}", path.display())]
    CorpusRead { path: PathBuf, message: String },

    /// The records file could not be read, parsed, or written.
    #[error("records out of sync ({}): {message}", path.display())]
    RecordSync { path: PathBuf, message: String },

    /// A word-field entry has an empty expected word set.
    #[error("word field '{id}' has no expected words")]
    DegenerateField { id: String },

    /// An idiom has fewer letters than the number of hint characters.
    #[error("idiom '{id}' has {letters} letter(s), {required} needed for a hint")]
    IdiomTooShort {
        id: String,
        letters: usize,
        required: usize,
    },

    /// No item is eligible for selection.
    #[error("no items available for the enabled question types")]
    EmptyPool,

    /// The answer source ran out of input mid-session.
    #[error("input closed before the session finished")]
    InputClosed,

    /// Invalid drill settings.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DrillError {
    pub(crate) fn corpus(kind: impl ToString, id: &str, message: impl Into<String>) -> Self {
        DrillError::CorpusFormat {
            kind: kind.to_string(),
            id: id.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn records(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DrillError::RecordSync {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Returns `true` for content errors confined to a single item.
    ///
    /// These are caught at load time; the item is excluded from the pool
    /// and the rest of the corpus stays usable.
    pub fn is_item_local(&self) -> bool {
        matches!(
            self,
            DrillError::DegenerateField { .. } | DrillError::IdiomTooShort { .. }
        )
    }
}
