//! Inverted index and document store.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTINGS_LIVE**: a word has an entry in `word_to_document_freqs` iff
//!    at least one live document contains it; removal prunes lists that
//!    empty out.
//! 2. **STORES_IN_SYNC**: `documents`, `document_ids`, and the posting lists
//!    describe the same set of live ids at every public-method boundary.
//! 3. **TEXT_OWNED_ONCE**: identical document texts share one `Arc<str>`
//!    buffer; every index key is a span into some live buffer.
//!
//! Mutation takes `&mut self`, so the borrow checker enforces the
//! read-mostly contract: no add or removal can interleave with an in-flight
//! query against the same engine.

use crate::error::SearchError;
use crate::tokenize::{is_valid_word, split_into_words, unique_non_empty_words, word_ranges};
use crate::types::{DocumentId, DocumentStatus, ExecutionPolicy};
use crate::word::Word;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

pub(crate) struct DocumentRecord {
    pub(crate) rating: i32,
    pub(crate) status: DocumentStatus,
    /// Canonical text backing every `Word` span of this document.
    pub(crate) text: Arc<str>,
    pub(crate) word_frequencies: BTreeMap<Word, f64>,
}

/// In-memory full-text search engine.
///
/// Documents are tokenized on [`add_document`](Self::add_document) into an
/// inverted word→document index and queried with the `find_top_documents`
/// and `match_document` families in [`search`](crate::search).
pub struct SearchEngine {
    pub(crate) stop_words: BTreeSet<String>,
    /// Deduplicated canonical texts; repeated identical documents share one buffer.
    texts: HashSet<Arc<str>>,
    /// word → document id → term frequency.
    pub(crate) word_to_document_freqs: HashMap<Word, BTreeMap<DocumentId, f64>>,
    pub(crate) documents: HashMap<DocumentId, DocumentRecord>,
    /// Live ids in insertion order.
    document_ids: Vec<DocumentId>,
}

impl SearchEngine {
    /// An engine with no stop words.
    pub fn new() -> Self {
        Self {
            stop_words: BTreeSet::new(),
            texts: HashSet::new(),
            word_to_document_freqs: HashMap::new(),
            documents: HashMap::new(),
            document_ids: Vec::new(),
        }
    }

    /// An engine with the given stop words; empty entries are dropped.
    pub fn with_stop_words<I, S>(stop_words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            stop_words: unique_non_empty_words(stop_words)?,
            ..Self::new()
        })
    }

    /// An engine whose stop words come from one space-delimited string.
    pub fn with_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Self::with_stop_words(split_into_words(text))
    }

    /// Tokenize and index a document.
    ///
    /// The text is validated in full before any structure is touched, so a
    /// failed call leaves the engine exactly as it was. Term frequency per
    /// word is `occurrences / word count`; the document's rating is the
    /// truncated mean of `ratings`, `0` when empty.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if document_id < 0 || self.documents.contains_key(&document_id) {
            return Err(SearchError::InvalidDocument(document_id));
        }

        // Validate-then-commit: collect the word spans first; nothing below
        // this loop can fail.
        let mut ranges = Vec::new();
        for range in word_ranges(text) {
            let word = &text[range.clone()];
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if !self.stop_words.contains(word) {
                ranges.push(range);
            }
        }

        let canonical = match self.texts.get(text) {
            Some(existing) => Arc::clone(existing),
            None => {
                let created: Arc<str> = Arc::from(text);
                self.texts.insert(Arc::clone(&created));
                created
            }
        };

        let inverse_word_count = if ranges.is_empty() {
            0.0
        } else {
            1.0 / ranges.len() as f64
        };
        let word_count = ranges.len();
        let mut word_frequencies: BTreeMap<Word, f64> = BTreeMap::new();
        for range in ranges {
            let word = Word::new(Arc::clone(&canonical), range);
            *self
                .word_to_document_freqs
                .entry(word.clone())
                .or_default()
                .entry(document_id)
                .or_insert(0.0) += inverse_word_count;
            *word_frequencies.entry(word).or_insert(0.0) += inverse_word_count;
        }

        self.documents.insert(
            document_id,
            DocumentRecord {
                rating: average_rating(ratings),
                status,
                text: canonical,
                word_frequencies,
            },
        );
        self.document_ids.push(document_id);
        debug!(document_id, words = word_count, "document indexed");
        Ok(())
    }

    /// Remove a document and every inverted-index contribution it made.
    ///
    /// # Panics
    ///
    /// Panics if `document_id` was never added. Callers are expected to
    /// track which ids are live; an absent id is a programming error, not a
    /// recoverable condition.
    pub fn remove_document(&mut self, document_id: DocumentId) {
        self.remove_document_with(ExecutionPolicy::Sequential, document_id);
    }

    /// [`remove_document`](Self::remove_document) with an explicit execution
    /// policy.
    ///
    /// The parallel variant fans the posting-list erasures across the rayon
    /// pool: each worker holds an exclusive borrow of a disjoint posting
    /// list, so no shared mutable state crosses words.
    ///
    /// # Panics
    ///
    /// Panics if `document_id` was never added.
    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, document_id: DocumentId) {
        let record = self
            .documents
            .remove(&document_id)
            .unwrap_or_else(|| panic!("removing unknown document id {document_id}"));

        match policy {
            ExecutionPolicy::Sequential => {
                for word in record.word_frequencies.keys() {
                    if let Some(postings) = self.word_to_document_freqs.get_mut(word.as_str()) {
                        postings.remove(&document_id);
                        if postings.is_empty() {
                            self.word_to_document_freqs.remove(word.as_str());
                        }
                    }
                }
            }
            ExecutionPolicy::Parallel => {
                self.word_to_document_freqs
                    .par_iter_mut()
                    .for_each(|(word, postings)| {
                        if record.word_frequencies.contains_key(word.as_str()) {
                            postings.remove(&document_id);
                        }
                    });
                self.word_to_document_freqs
                    .retain(|_, postings| !postings.is_empty());
            }
        }

        let position = self
            .document_ids
            .iter()
            .position(|&id| id == document_id)
            .unwrap_or_else(|| panic!("document id {document_id} missing from ordering container"));
        self.document_ids.remove(position);

        // Drop the canonical buffer once nothing in the index spans it:
        // two remaining references means the store's copy and ours.
        let DocumentRecord {
            text,
            word_frequencies,
            ..
        } = record;
        drop(word_frequencies);
        if Arc::strong_count(&text) == 2 {
            self.texts.remove(&*text);
        }
        debug!(document_id, "document removed");
    }

    /// Per-word term frequencies of a live document; empty for unknown ids.
    pub fn word_frequencies(&self, document_id: DocumentId) -> &BTreeMap<Word, f64> {
        static EMPTY: BTreeMap<Word, f64> = BTreeMap::new();
        self.documents
            .get(&document_id)
            .map_or(&EMPTY, |record| &record.word_frequencies)
    }

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in insertion order.
    ///
    /// The iterator is restartable and snapshot-stable: mutation requires
    /// `&mut self`, so nothing can change underneath it.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.document_ids.iter().copied()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a SearchEngine {
    type Item = DocumentId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocumentId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids.iter().copied()
    }
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    ratings.iter().sum::<i32>() / ratings.len() as i32
}
