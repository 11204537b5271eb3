//! Relevance search and document matching.
//!
//! One algorithm, two dispatch strategies. A query runs
//! PARSE → ACCUMULATE → FILTER-MINUS → COLLECT → RANK → TRUNCATE; the
//! [`ExecutionPolicy`] only decides whether ACCUMULATE fans plus words
//! across the rayon pool (writing through the sharded
//! [`ConcurrentMap`](crate::ConcurrentMap)) or walks them on the calling
//! thread into a plain ordered map. Both paths materialize candidates in
//! ascending id order, so ranked output is identical between modes.

use crate::concurrent_map::ConcurrentMap;
use crate::engine::SearchEngine;
use crate::error::SearchError;
use crate::query::{parse_query, Query};
use crate::ranking::rank_documents;
use crate::types::{Document, DocumentId, DocumentMatch, DocumentStatus, ExecutionPolicy};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::trace;

/// Bucket count of the relevance aggregator used by parallel searches.
///
/// Tunable trade between memory (mostly-empty buckets) and lock contention;
/// one query touches at most `document_count` keys spread over these buckets.
pub const AGGREGATOR_BUCKET_COUNT: usize = 100;

impl SearchEngine {
    /// Top documents for `raw_query`: sequential, filtered to
    /// [`DocumentStatus::Active`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query)
    }

    /// Top [`DocumentStatus::Active`] documents under an explicit policy.
    pub fn find_top_documents_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with_status(policy, raw_query, DocumentStatus::Active)
    }

    /// Top documents carrying exactly `status`.
    pub fn find_top_documents_with_status(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_by(policy, raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents accepted by an arbitrary predicate over
    /// `(id, status, rating)`.
    ///
    /// The predicate is applied during accumulation and must be pure; it is
    /// called from worker threads under the parallel policy, hence `Sync`.
    /// Results are sorted by descending TF-IDF relevance — ties within
    /// [`RELEVANCE_EPSILON`](crate::RELEVANCE_EPSILON) broken by descending
    /// rating — and capped at
    /// [`MAX_RESULT_COUNT`](crate::MAX_RESULT_COUNT). Parse failures are
    /// reported before any accumulation starts.
    pub fn find_top_documents_by<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(&self.stop_words, raw_query)?;
        trace!(query = raw_query, ?policy, "executing search");

        let mut matched = match policy {
            ExecutionPolicy::Sequential => self.find_all_documents(&query, &predicate),
            ExecutionPolicy::Parallel => self.find_all_documents_parallel(&query, &predicate),
        };
        rank_documents(policy, &mut matched);
        Ok(matched)
    }

    /// Which of the query's plus words occur in document `document_id`.
    ///
    /// If any minus word occurs there, the word list is empty — minus wins
    /// before any plus word is examined.
    ///
    /// # Panics
    ///
    /// Panics if `document_id` was never added; see
    /// [`remove_document`](Self::remove_document) for the precondition
    /// contract.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<DocumentMatch, SearchError> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, document_id)
    }

    /// [`match_document`](Self::match_document) with an explicit policy.
    ///
    /// The parallel variant scans plus words across the pool; matches are
    /// collected into per-worker buffers and merged back in plus-word order,
    /// so output is identical to the sequential scan. The minus-word
    /// short-circuit is checked first in both modes.
    ///
    /// # Panics
    ///
    /// Panics if `document_id` was never added.
    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<DocumentMatch, SearchError> {
        let query = parse_query(&self.stop_words, raw_query)?;
        let record = self
            .documents
            .get(&document_id)
            .unwrap_or_else(|| panic!("matching unknown document id {document_id}"));

        for &word in &query.minus_words {
            if record.word_frequencies.contains_key(word) {
                return Ok(DocumentMatch {
                    words: Vec::new(),
                    status: record.status,
                });
            }
        }

        let matched_word = |word: &str| {
            record
                .word_frequencies
                .get_key_value(word)
                .map(|(word, _)| word.clone())
        };
        let words = match policy {
            ExecutionPolicy::Sequential => query
                .plus_words
                .iter()
                .filter_map(|&word| matched_word(word))
                .collect(),
            ExecutionPolicy::Parallel => query
                .plus_words
                .par_iter()
                .filter_map(|&word| matched_word(word))
                .collect(),
        };

        Ok(DocumentMatch {
            words,
            status: record.status,
        })
    }

    fn inverse_document_frequency(&self, documents_with_word: usize) -> f64 {
        (self.documents.len() as f64 / documents_with_word as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();

        for &word in &query.plus_words {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                continue;
            };
            let inverse_document_freq = self.inverse_document_frequency(postings.len());
            for (&document_id, &term_freq) in postings {
                let record = &self.documents[&document_id];
                if predicate(document_id, record.status, record.rating) {
                    *document_to_relevance.entry(document_id).or_insert(0.0) +=
                        term_freq * inverse_document_freq;
                }
            }
        }

        for &word in &query.minus_words {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                continue;
            };
            for &document_id in postings.keys() {
                document_to_relevance.remove(&document_id);
            }
        }

        document_to_relevance
            .into_iter()
            .map(|(document_id, relevance)| Document {
                id: document_id,
                relevance,
                rating: self.documents[&document_id].rating,
            })
            .collect()
    }

    fn find_all_documents_parallel<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance = ConcurrentMap::<f64>::new(AGGREGATOR_BUCKET_COUNT);

        // ACCUMULATE: one task per plus word. Addition into a document's
        // slot is commutative across words, so task order cannot change the
        // accumulated relevance beyond float summation order.
        query.plus_words.par_iter().for_each(|&word| {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                return;
            };
            let inverse_document_freq = self.inverse_document_frequency(postings.len());
            for (&document_id, &term_freq) in postings {
                let record = &self.documents[&document_id];
                if predicate(document_id, record.status, record.rating) {
                    *document_to_relevance.access(document_id) +=
                        term_freq * inverse_document_freq;
                }
            }
        });

        // FILTER-MINUS: disqualification is global and unconditional.
        for &word in &query.minus_words {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                continue;
            };
            for &document_id in postings.keys() {
                document_to_relevance.erase(document_id);
            }
        }

        // COLLECT: ordered export, transform fanned across the pool. The
        // collect preserves input order, so candidates come out ascending by
        // id exactly as the sequential path produces them.
        let accumulated: Vec<(DocumentId, f64)> =
            document_to_relevance.export_ordered().into_iter().collect();
        accumulated
            .into_par_iter()
            .map(|(document_id, relevance)| Document {
                id: document_id,
                relevance,
                rating: self.documents[&document_id].rating,
            })
            .collect()
    }
}
