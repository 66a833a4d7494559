/*!
 * Property-style tests for text chunking
 */

use voxdub::chunk::{chunk_count, split, split_with, ChunkBoundary};

const SAMPLE: &str = "Съешь же ещё этих мягких французских булок, да выпей чаю. \
                      The quick brown fox jumps over the lazy dog. 日本語のテキストも混ざっている。";

#[test]
fn test_chunks_reconstruct_input_for_every_length() {
    for max in 1..=SAMPLE.chars().count() + 1 {
        for boundary in [ChunkBoundary::Fixed, ChunkBoundary::Word] {
            let chunks = split_with(SAMPLE, max, boundary).unwrap();
            assert_eq!(chunks.concat(), SAMPLE, "max {max}, {boundary:?}");
            assert!(chunks.iter().all(|c| !c.is_empty() && c.chars().count() <= max));
        }
    }
}

#[test]
fn test_fixed_chunk_count_is_ceiling() {
    for max in [1, 7, 50, 4999] {
        let chunks = split(SAMPLE, max).unwrap();
        assert_eq!(chunks.len(), chunk_count(SAMPLE, max));
        // Every chunk but the last is full
        let (last, full) = chunks.split_last().unwrap();
        assert!(full.iter().all(|c| c.chars().count() == max));
        assert!(last.chars().count() <= max);
    }
}
