//! Overlapping fixed-size passage windows

use billsearch_core::{SearchError, SearchResult};

/// Split `text` into windows of `size` whitespace tokens, adjacent windows
/// sharing `overlap` tokens. The last window may be shorter.
pub fn chunk(text: &str, size: usize, overlap: usize) -> SearchResult<Vec<String>> {
    if size <= overlap {
        return Err(SearchError::invalid(format!(
            "chunk size ({size}) must be larger than overlap ({overlap})"
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let step = size - overlap;
    let mut chunks = Vec::new();

    let mut start = 0;
    while start < words.len() {
        let end = (start + size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if start + size >= words.len() {
            break;
        }
        start += step;
    }

    Ok(chunks)
}
