//! Layer 1 — multi-strategy fuzzy matching.
//!
//! Four strategies are tried per chunk, in increasing cost / decreasing
//! precision order, stopping at the first hit: exact substring, normalized
//! substring, multi-anchor word search, sliding window.

use super::normalize::normalize_with_origins;
use super::similarity::string_similarity;
use super::types::{Confidence, MatchMethod, MatchResult, SourceChunk};
use crate::config::ThresholdConfig;

/// Run Layer 1 over every chunk, returning the chunks it matched and the
/// chunks it could not (left for Layer 2).
pub fn run(
    chunks: Vec<SourceChunk>,
    target: &str,
    thresholds: &ThresholdConfig,
) -> (Vec<MatchResult>, Vec<SourceChunk>) {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for chunk in chunks {
        match try_match(&chunk, target, thresholds) {
            Some((start, end, confidence, method, similarity)) => {
                matched.push(MatchResult {
                    chunk,
                    start_offset: start,
                    end_offset: end,
                    confidence,
                    method,
                    similarity: Some(similarity),
                });
            }
            None => unmatched.push(chunk),
        }
    }

    (matched, unmatched)
}

type Hit = (usize, usize, Confidence, MatchMethod, f32);

fn try_match(chunk: &SourceChunk, target: &str, thresholds: &ThresholdConfig) -> Option<Hit> {
    if chunk.content.is_empty() {
        return None;
    }

    exact_substring(chunk, target)
        .or_else(|| normalized_substring(chunk, target))
        .or_else(|| multi_anchor_search(chunk, target))
        .or_else(|| sliding_window(chunk, target, thresholds))
}

fn exact_substring(chunk: &SourceChunk, target: &str) -> Option<Hit> {
    let start = target.find(&chunk.content)?;
    let end = start + chunk.content.len();
    Some((start, end, Confidence::Exact, MatchMethod::ExactMatch, 1.0))
}

fn normalized_substring(chunk: &SourceChunk, target: &str) -> Option<Hit> {
    let (norm_chunk, _) = normalize_with_origins(&chunk.content);
    if norm_chunk.is_empty() {
        return None;
    }
    let (norm_target, origins) = normalize_with_origins(target);

    let norm_start = norm_target.find(&norm_chunk)?;
    let norm_end = norm_start + norm_chunk.len();

    let start = origins[norm_start];
    let end = origins[norm_end];

    if start >= end {
        return None;
    }

    Some((
        start,
        end,
        Confidence::High,
        MatchMethod::NormalizedMatch,
        0.95,
    ))
}

fn multi_anchor_search(chunk: &SourceChunk, target: &str) -> Option<Hit> {
    let words: Vec<&str> = chunk.content.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let first = join_words(&words, 0, 4);
    let mid_start = words.len().saturating_sub(1) / 2;
    let mid = join_words(&words, mid_start.min(words.len()), 4);
    let last_start = words.len().saturating_sub(4);
    let last = join_words(&words, last_start, 4);

    let first_pos = target.find(&first)?;
    let first_end = first_pos + first.len();

    let mid_pos = target[first_end..].find(&mid)? + first_end;
    let mid_end = mid_pos + mid.len();

    let last_pos = target[mid_end..].find(&last)? + mid_end;
    let last_end = last_pos + last.len();

    Some((
        first_pos,
        last_end,
        Confidence::High,
        MatchMethod::MultiAnchorSearch,
        0.85,
    ))
}

fn join_words(words: &[&str], start: usize, count: usize) -> String {
    let end = (start + count).min(words.len());
    words[start..end].join(" ")
}

fn sliding_window(chunk: &SourceChunk, target: &str, thresholds: &ThresholdConfig) -> Option<Hit> {
    let window_len_chars = chunk.content.chars().count();
    if window_len_chars == 0 {
        return None;
    }

    let mut boundaries: Vec<usize> = target.char_indices().map(|(i, _)| i).collect();
    boundaries.push(target.len());

    let total_chars = boundaries.len() - 1;
    if total_chars < window_len_chars {
        return None;
    }

    let stride = (window_len_chars / 4).max(1);

    let mut best: Option<(usize, usize, f32)> = None;
    let mut start_char = 0;
    while start_char + window_len_chars <= total_chars {
        let start_byte = boundaries[start_char];
        let end_byte = boundaries[start_char + window_len_chars];
        let window = &target[start_byte..end_byte];

        let sim = string_similarity(&chunk.content, window);
        if sim > thresholds.sliding_window_min {
            match &best {
                Some((_, _, best_sim)) if *best_sim >= sim => {}
                _ => best = Some((start_byte, end_byte, sim)),
            }
        }

        start_char += stride;
    }

    let (start, end, sim) = best?;
    let confidence = if sim >= 1.0 {
        Confidence::Exact
    } else if sim >= thresholds.sliding_window_high {
        Confidence::High
    } else {
        Confidence::Medium
    };

    Some((start, end, confidence, MatchMethod::SlidingWindow, sim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::types::ChunkMeta;

    fn chunk(index: usize, content: &str) -> SourceChunk {
        SourceChunk {
            index,
            content: content.to_string(),
            meta: ChunkMeta::default(),
        }
    }

    #[test]
    fn exact_match_wins_first() {
        let target = "The quick brown fox jumps over the lazy dog.";
        let c = chunk(0, "quick brown fox");
        let (matched, unmatched) = run(vec![c], target, &ThresholdConfig::default());
        assert!(unmatched.is_empty());
        assert_eq!(matched[0].method, MatchMethod::ExactMatch);
        assert_eq!(matched[0].confidence, Confidence::Exact);
        assert_eq!(&target[matched[0].start_offset..matched[0].end_offset], "quick brown fox");
    }

    #[test]
    fn normalized_match_handles_whitespace_and_case_drift() {
        let target = "The Quick Brown  Fox jumps.";
        let c = chunk(0, "quick brown fox");
        let (matched, unmatched) = run(vec![c], target, &ThresholdConfig::default());
        assert!(unmatched.is_empty());
        assert_eq!(matched[0].method, MatchMethod::NormalizedMatch);
        assert_eq!(matched[0].confidence, Confidence::High);
    }

    #[test]
    fn multi_anchor_recovers_when_an_interior_word_was_edited() {
        let target = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike november oscar papa quebec romeo sierra tango";
        let chunk_text = "alpha bravo charlie delta echo foxtrot GOLFX hotel india juliet kilo lima mike november oscar papa quebec romeo sierra tango";
        let c = chunk(0, chunk_text);
        let (matched, unmatched) = run(vec![c], target, &ThresholdConfig::default());
        assert!(unmatched.is_empty());
        assert_eq!(matched[0].method, MatchMethod::MultiAnchorSearch);
    }

    #[test]
    fn sliding_window_recovers_near_miss_text() {
        let target = "zzzzzzzzzz the quick brown fax jumps over the lazy dog zzzzzzzzzz";
        let c = chunk(0, "the quick brown fox jumps over the lazy dog");
        let (matched, unmatched) = run(vec![c], target, &ThresholdConfig::default());
        assert!(unmatched.is_empty());
        assert_eq!(matched[0].method, MatchMethod::SlidingWindow);
    }

    #[test]
    fn unmatchable_chunk_falls_through_to_layer_2() {
        let target = "nothing relevant here at all";
        let c = chunk(0, "completely unrelated content that does not appear above whatsoever in any form");
        let (matched, unmatched) = run(vec![c], target, &ThresholdConfig::default());
        assert!(matched.is_empty());
        assert_eq!(unmatched.len(), 1);
    }
}
