//! Query parsing.
//!
//! A raw query is whitespace-split into terms; a leading `-` marks a minus
//! word. Both word sets come out sorted and deduplicated so repeated terms
//! cannot double-count relevance and downstream parallel processing is
//! order-independent. A word named both ways is a minus word only.

use crate::error::SearchError;
use crate::tokenize::{is_valid_word, split_into_words};
use std::collections::BTreeSet;

/// A parsed query borrowing from the raw query string.
#[derive(Debug)]
pub(crate) struct Query<'a> {
    /// Sorted, deduplicated terms that contribute relevance.
    pub plus_words: Vec<&'a str>,
    /// Sorted, deduplicated terms that disqualify a document outright.
    pub minus_words: Vec<&'a str>,
}

/// Parse `text`, dropping stop words after classification.
///
/// Fails with [`SearchError::InvalidQueryTerm`] on a bare `-`, a `--` prefix,
/// or control characters — before the caller has done any accumulation.
pub(crate) fn parse_query<'a>(
    stop_words: &BTreeSet<String>,
    text: &'a str,
) -> Result<Query<'a>, SearchError> {
    let mut plus_words = Vec::new();
    let mut minus_words = Vec::new();

    for term in split_into_words(text) {
        let (word, is_minus) = match term.strip_prefix('-') {
            Some(stripped) => (stripped, true),
            None => (term, false),
        };
        if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
            return Err(SearchError::InvalidQueryTerm(term.to_string()));
        }
        if stop_words.contains(word) {
            continue;
        }
        if is_minus {
            minus_words.push(word);
        } else {
            plus_words.push(word);
        }
    }

    plus_words.sort_unstable();
    plus_words.dedup();
    minus_words.sort_unstable();
    minus_words.dedup();
    // Minus takes priority: a word must never sit in both sets.
    plus_words.retain(|word| minus_words.binary_search(word).is_err());

    Ok(Query {
        plus_words,
        minus_words,
    })
}
