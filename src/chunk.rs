//! Splitting long text into request-sized pieces.
//!
//! Lengths are counted in `char`s so a chunk never cuts through a multi-byte
//! character. Chunks are borrowed slices of the input; joining them in order
//! with no separator gives back the input exactly.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxError};

/// Where a chunk is allowed to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkBoundary {
    /// Fixed windows at 0, max, 2*max, ... regardless of content
    #[default]
    Fixed,
    /// Shorten each window to end after its last whitespace, when it has one
    Word,
}

/// Split `text` into fixed windows of at most `max_length` chars.
///
/// Empty input gives an empty sequence.
pub fn split(text: &str, max_length: usize) -> Result<Vec<&str>> {
    split_with(text, max_length, ChunkBoundary::Fixed)
}

/// Split `text` into chunks of at most `max_length` chars using `boundary`.
pub fn split_with(text: &str, max_length: usize, boundary: ChunkBoundary) -> Result<Vec<&str>> {
    if max_length == 0 {
        return Err(VoxError::Config("chunk length must be greater than zero".to_string()));
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let mut cut = window_end(rest, max_length);

        if boundary == ChunkBoundary::Word && cut < rest.len() {
            if let Some(after_space) = last_whitespace_end(&rest[..cut]) {
                // Never shorten a window down to whitespace only
                if !rest[..after_space].trim().is_empty() {
                    cut = after_space;
                }
            }
        }

        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }

    Ok(chunks)
}

/// Number of chunks `split` produces for `text`.
pub fn chunk_count(text: &str, max_length: usize) -> usize {
    if max_length == 0 {
        return 0;
    }
    text.chars().count().div_ceil(max_length)
}

/// Byte offset just past the first `max_chars` chars of `s`.
fn window_end(s: &str, max_chars: usize) -> usize {
    s.char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

fn last_whitespace_end(window: &str) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, c)| idx + c.len_utf8())
}
