//! Result ordering and truncation.
//!
//! # INVARIANT: EPSILON_TIE_BREAK
//!
//! Relevances within [`RELEVANCE_EPSILON`] of each other compare as equal
//! and fall back to descending rating. Sequential and parallel accumulation
//! sum the same floating-point terms in different orders; the epsilon keeps
//! those runs from ranking the same corpus differently.

use crate::types::{Document, ExecutionPolicy};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Upper bound on the number of documents a search returns.
pub const MAX_RESULT_COUNT: usize = 5;

/// Relevance differences below this are ties, broken by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

fn compare(lhs: &Document, rhs: &Document) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        rhs.rating.cmp(&lhs.rating)
    } else {
        rhs.relevance
            .partial_cmp(&lhs.relevance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Sort candidates by descending relevance (rating on ties) and truncate to
/// [`MAX_RESULT_COUNT`].
///
/// Both arms are stable sorts, so candidates that compare equal keep the
/// ascending-id order both accumulation paths produce, and the two policies
/// return identically ordered results.
pub(crate) fn rank_documents(policy: ExecutionPolicy, documents: &mut Vec<Document>) {
    match policy {
        ExecutionPolicy::Sequential => documents.sort_by(compare),
        ExecutionPolicy::Parallel => documents.par_sort_by(compare),
    }
    documents.truncate(MAX_RESULT_COUNT);
}
