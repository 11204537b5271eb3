//! In-memory full-text search with TF-IDF ranking and parallel queries.
//!
//! Documents are ingested as raw text, tokenized into an inverted
//! word→document index, and queried with a boolean plus/minus term syntax.
//! Results are ranked by TF-IDF relevance with the document rating as
//! tie-break. Searches, matching, and removal each offer a sequential and a
//! data-parallel execution policy with identical output.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ tokenize.rs  │────▶│   engine.rs   │────▶│  search.rs   │
//! │ (word spans, │     │ (inverted idx,│     │ (TF-IDF,     │
//! │  validation) │     │  doc store)   │     │  matching)   │
//! └──────────────┘     └───────────────┘     └──────┬───────┘
//!        │                     │                    │
//!        ▼                     ▼                    ▼
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │  query.rs    │     │   word.rs     │     │ concurrent_  │
//! │ (plus/minus  │     │ (zero-copy    │     │ map.rs       │
//! │  parsing)    │     │  spans)       │     │ (sharded     │
//! └──────────────┘     └───────────────┘     │  aggregator) │
//!                                            └──────────────┘
//! ```
//!
//! `stats.rs` and `batch.rs` sit on top of the search surface: a trailing-
//! window no-result counter and a rayon fan-out over query batches.
//!
//! # Usage
//!
//! ```
//! use scour::{DocumentStatus, ExecutionPolicy, SearchEngine};
//!
//! let mut engine = SearchEngine::with_stop_words_text("in the").unwrap();
//! engine
//!     .add_document(0, "curly cat in the city", DocumentStatus::Active, &[1, 2, 3])
//!     .unwrap();
//!
//! let found = engine
//!     .find_top_documents_with(ExecutionPolicy::Parallel, "cat -dog")
//!     .unwrap();
//! assert_eq!(found[0].id, 0);
//! ```

mod batch;
mod concurrent_map;
mod engine;
mod error;
mod query;
mod ranking;
mod search;
mod stats;
mod tokenize;
mod types;
mod word;

pub use batch::{process_queries, process_queries_flat};
pub use concurrent_map::ConcurrentMap;
pub use engine::SearchEngine;
pub use error::SearchError;
pub use ranking::{MAX_RESULT_COUNT, RELEVANCE_EPSILON};
pub use search::AGGREGATOR_BUCKET_COUNT;
pub use stats::{QueryStats, REQUEST_WINDOW};
pub use tokenize::{is_valid_word, split_into_words};
pub use types::{Document, DocumentId, DocumentMatch, DocumentStatus, ExecutionPolicy};
pub use word::Word;
