//! Word splitting and validation.
//!
//! Documents and queries share one tokenizer: whitespace-delimited spans,
//! reported as byte ranges into the input so no word text is copied. A word
//! that survives splitting must not contain control characters; anything in
//! `U+0000..U+0020` that is not itself whitespace poisons the whole input.

use crate::error::SearchError;
use std::collections::BTreeSet;
use std::ops::Range;

/// Split `text` into whitespace-delimited words.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Split `text` into the byte ranges of its whitespace-delimited words.
///
/// Ranges index into `text` itself; slicing `text` with a returned range
/// yields exactly the word. This is what lets the index store spans into a
/// shared buffer instead of owned copies.
pub(crate) fn word_ranges(text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    let base = text.as_ptr() as usize;
    text.split_whitespace().map(move |word| {
        let start = word.as_ptr() as usize - base;
        start..start + word.len()
    })
}

/// A word is valid when it contains no control characters.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| (c as u32) < 0x20)
}

/// Build the deduplicated stop-word set, dropping empty entries.
///
/// Fails with [`SearchError::InvalidWord`] if any stop word contains control
/// characters, so a bad configuration is caught at construction rather than
/// silently indexed around.
pub(crate) fn unique_non_empty_words<I, S>(words: I) -> Result<BTreeSet<String>, SearchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = BTreeSet::new();
    for word in words {
        let word = word.as_ref();
        if word.is_empty() {
            continue;
        }
        if !is_valid_word(word) {
            return Err(SearchError::InvalidWord(word.to_string()));
        }
        set.insert(word.to_string());
    }
    Ok(set)
}
