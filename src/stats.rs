//! Request-rate statistics over a trailing window.
//!
//! [`QueryStats`] wraps a shared engine reference and mirrors its search
//! surface. Each request advances a logical clock by one tick; outcomes
//! older than [`REQUEST_WINDOW`] ticks fall out of the window, and the
//! wrapper keeps a running count of requests that returned no documents.

use crate::engine::SearchEngine;
use crate::error::SearchError;
use crate::types::{Document, DocumentId, DocumentStatus, ExecutionPolicy};
use std::collections::VecDeque;

/// Window length in ticks (one tick per request): minutes in a day.
pub const REQUEST_WINDOW: u64 = 1440;

struct QueryOutcome {
    time: u64,
    no_result: bool,
}

/// Sliding-window counter of empty-result searches.
pub struct QueryStats<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<QueryOutcome>,
    current_time: u64,
    no_result_count: usize,
}

impl<'a> QueryStats<'a> {
    pub fn new(engine: &'a SearchEngine) -> Self {
        Self {
            engine,
            requests: VecDeque::new(),
            current_time: 0,
            no_result_count: 0,
        }
    }

    /// Search with the engine's defaults, recording the outcome.
    pub fn find_top_documents(&mut self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        let result = self.engine.find_top_documents(raw_query)?;
        self.record(&result);
        Ok(result)
    }

    /// Search filtered to `status`, recording the outcome.
    pub fn find_top_documents_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        let result = self.engine.find_top_documents_with_status(
            ExecutionPolicy::Sequential,
            raw_query,
            status,
        )?;
        self.record(&result);
        Ok(result)
    }

    /// Search with an arbitrary predicate, recording the outcome.
    ///
    /// Parse failures propagate without consuming a tick: only completed
    /// requests enter the window.
    pub fn find_top_documents_by<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let result = self.engine.find_top_documents_by(
            ExecutionPolicy::Sequential,
            raw_query,
            predicate,
        )?;
        self.record(&result);
        Ok(result)
    }

    /// How many requests in the current window returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    fn record(&mut self, result: &[Document]) {
        self.current_time += 1;

        while let Some(oldest) = self.requests.front() {
            if self.current_time - oldest.time < REQUEST_WINDOW {
                break;
            }
            if oldest.no_result {
                self.no_result_count -= 1;
            }
            self.requests.pop_front();
        }

        let no_result = result.is_empty();
        self.requests.push_back(QueryOutcome {
            time: self.current_time,
            no_result,
        });
        if no_result {
            self.no_result_count += 1;
        }
    }
}
