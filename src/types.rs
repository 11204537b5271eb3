//! The building blocks of the search engine API.
//!
//! These types cross the public boundary: document identity and status go in
//! with [`SearchEngine::add_document`], ranked [`Document`] triples and
//! [`DocumentMatch`] word sets come back out. Everything here is plain data;
//! the interesting invariants live in the engine that produces them.
//!
//! [`SearchEngine::add_document`]: crate::SearchEngine::add_document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-assigned document identifier.
///
/// Ids are non-negative; [`SearchEngine::add_document`] rejects negative ids
/// with [`SearchError::InvalidDocument`]. The signed representation keeps the
/// rejection observable at the API instead of silently unrepresentable.
///
/// [`SearchEngine::add_document`]: crate::SearchEngine::add_document
/// [`SearchError::InvalidDocument`]: crate::SearchError::InvalidDocument
pub type DocumentId = i32;

/// User-facing document classification.
///
/// A classification, not a deletion marker: a `Removed` document is still
/// indexed and still matches queries that filter for `Removed` status.
/// Actual deletion is [`SearchEngine::remove_document`].
///
/// [`SearchEngine::remove_document`]: crate::SearchEngine::remove_document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Live content; the default filter for searches that don't name one.
    #[default]
    Active,
    /// Moderated out of default results.
    Banned,
    /// Withdrawn by its owner but retained for audit-style queries.
    Removed,
}

/// One ranked search result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// TF-IDF relevance accumulated over the query's plus words.
    pub relevance: f64,
    /// Truncated mean of the ratings supplied at add time.
    pub rating: i32,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "document {} (relevance {:.6}, rating {})",
            self.id, self.relevance, self.rating
        )
    }
}

/// Result of matching a single document against a query.
///
/// `words` is empty when any minus word of the query occurs in the document,
/// regardless of how many plus words also occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMatch {
    /// The query's plus words that occur in the document, in sorted order.
    pub words: Vec<crate::Word>,
    pub status: DocumentStatus,
}

/// How a search, match, or removal dispatches its work.
///
/// Both variants produce identical output for identical input; `Parallel`
/// fans independent units of work (one per query term, or one per affected
/// word) across the rayon pool and joins before returning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}
