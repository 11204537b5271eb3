//! Error taxonomy.
//!
//! Every variant is a caller-input error reported synchronously at the point
//! of validation, before any index mutation. There are no transient classes
//! and nothing to retry: an operation either succeeds or fails immediately.
//!
//! Looking up an id that was never added (in [`remove_document`] or
//! [`match_document`]) is a precondition violation, not an error value —
//! those methods panic, as documented on each.
//!
//! [`remove_document`]: crate::SearchEngine::remove_document
//! [`match_document`]: crate::SearchEngine::match_document

use crate::types::DocumentId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The document id is negative or already present in the engine.
    #[error("invalid document id {0}: negative or already added")]
    InvalidDocument(DocumentId),

    /// A word in the document (or stop-word list) contains control characters.
    #[error("word {0:?} contains control characters")]
    InvalidWord(String),

    /// A query term is empty after stripping `-`, starts with a second `-`,
    /// or contains control characters.
    #[error("query term {0:?} is malformed")]
    InvalidQueryTerm(String),
}
