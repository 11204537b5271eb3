//! Batch query dispatch.
//!
//! Fans a slice of queries across the rayon pool; each worker runs an
//! independent sequential search, results come back in input order. The
//! first malformed query aborts the whole batch.

use crate::engine::SearchEngine;
use crate::error::SearchError;
use crate::types::Document;
use rayon::prelude::*;

/// Run every query against `engine`, one result list per query, in order.
pub fn process_queries(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Vec<Document>>, SearchError> {
    queries
        .par_iter()
        .map(|raw_query| engine.find_top_documents(raw_query))
        .collect()
}

/// Like [`process_queries`], flattened into one list in query order.
pub fn process_queries_flat(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Document>, SearchError> {
    Ok(process_queries(engine, queries)?
        .into_iter()
        .flatten()
        .collect())
}
