//! Layer 4 — deterministic anchor interpolation.
//!
//! The layer of last resort: given whatever anchors the earlier three layers
//! managed to place, every remaining chunk is assigned a geometrically
//! interpolated span. This layer cannot fail by design — its only error
//! variant exists purely for API uniformity with the other layers and must
//! never actually be constructed by correct arithmetic.

use super::types::{Confidence, MatchMethod, MatchResult, SourceChunk};
use crate::error::{Result, XzeError};

/// Fill in every chunk in `unmatched` with a synthetic, interpolated span,
/// using `anchors` (already-matched results, any order) as bracketing
/// reference points.
pub fn run(
    unmatched: Vec<SourceChunk>,
    anchors: &[MatchResult],
    target: &str,
    total_chunks: usize,
) -> Result<Vec<MatchResult>> {
    if unmatched.is_empty() {
        return Ok(Vec::new());
    }

    let target_len = target.len();
    let mut sorted_anchors: Vec<&MatchResult> = anchors.iter().collect();
    sorted_anchors.sort_by_key(|a| a.chunk.index);

    let mean_len = mean_anchor_len(&sorted_anchors, target_len, total_chunks);

    let mut results = Vec::with_capacity(unmatched.len());
    for chunk in unmatched {
        let (start, end) = interpolate(chunk.index, &sorted_anchors, mean_len, target, total_chunks)?;
        results.push(MatchResult {
            chunk,
            start_offset: start,
            end_offset: end,
            confidence: Confidence::Synthetic,
            method: MatchMethod::Interpolation,
            similarity: None,
        });
    }

    Ok(results)
}

fn mean_anchor_len(anchors: &[&MatchResult], target_len: usize, total_chunks: usize) -> usize {
    if anchors.is_empty() {
        return if total_chunks == 0 { 0 } else { target_len / total_chunks };
    }
    let total: usize = anchors.iter().map(|a| a.end_offset - a.start_offset).sum();
    (total / anchors.len()).max(1)
}

fn interpolate(
    index: usize,
    anchors: &[&MatchResult],
    mean_len: usize,
    target: &str,
    total_chunks: usize,
) -> Result<(usize, usize)> {
    let target_len = target.len();

    if anchors.is_empty() {
        if total_chunks == 0 {
            return Err(XzeError::internal_invariant_violation(
                "interpolation attempted with zero total chunks",
            ));
        }
        let start = (index * target_len) / total_chunks;
        let end = ((index + 1) * target_len) / total_chunks;
        let start = nearest_char_boundary(target, start.min(target_len));
        let end = nearest_char_boundary(target, end.min(target_len)).max(start);
        return Ok((start, end));
    }

    let prev = anchors.iter().filter(|a| a.chunk.index < index).last();
    let next = anchors.iter().find(|a| a.chunk.index > index);

    let (start, end) = match (prev, next) {
        (Some(prev), Some(next)) => {
            let span = (next.chunk.index - prev.chunk.index) as f64;
            let t = (index - prev.chunk.index) as f64 / span;
            let gap = next.start_offset.saturating_sub(prev.end_offset) as f64;
            let start = prev.end_offset + (t * gap).floor() as usize;
            let end = (start + mean_len).min(next.start_offset).min(target_len);
            let start = start.min(end);
            (start, end)
        }
        (Some(prev), None) => {
            let steps = index - prev.chunk.index - 1;
            let start = (prev.end_offset + steps * mean_len).min(target_len);
            let end = (start + mean_len).min(target_len);
            (start, end)
        }
        (None, Some(next)) => {
            let end = next.start_offset.min(target_len);
            let start = end.saturating_sub(mean_len);
            (start, end)
        }
        (None, None) => unreachable!("anchors is non-empty but neither prev nor next found"),
    };

    // Byte arithmetic above can land mid-character; snap both ends out to the
    // nearest real char boundary before handing the span to a caller.
    let start = nearest_char_boundary(target, start);
    let end = nearest_char_boundary(target, end).max(start);

    if start > end || end > target_len {
        return Err(XzeError::internal_invariant_violation(format!(
            "interpolated span [{start}, {end}) invalid for target length {target_len}"
        )));
    }

    Ok((start, end))
}

/// Round `offset` up to the nearest valid UTF-8 char boundary in `target`,
/// clamping to `target.len()` first since `str::is_char_boundary` treats any
/// offset past the end as invalid.
fn nearest_char_boundary(target: &str, offset: usize) -> usize {
    let len = target.len();
    let mut pos = offset.min(len);
    while pos < len && !target.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::types::ChunkMeta;

    fn chunk(index: usize) -> SourceChunk {
        SourceChunk {
            index,
            content: format!("chunk {index}"),
            meta: ChunkMeta::default(),
        }
    }

    fn anchor(index: usize, start: usize, end: usize) -> MatchResult {
        MatchResult {
            chunk: chunk(index),
            start_offset: start,
            end_offset: end,
            confidence: Confidence::Exact,
            method: MatchMethod::ExactMatch,
            similarity: Some(1.0),
        }
    }

    #[test]
    fn no_anchors_splits_target_evenly() {
        let target = "x".repeat(100);
        let unmatched = vec![chunk(0), chunk(1), chunk(2), chunk(3)];
        let results = run(unmatched, &[], &target, 4).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].start_offset, 0);
        assert_eq!(results[0].end_offset, 25);
        assert_eq!(results[3].start_offset, 75);
        assert_eq!(results[3].end_offset, 100);
        for r in &results {
            assert_eq!(r.confidence, Confidence::Synthetic);
            assert_eq!(r.method, MatchMethod::Interpolation);
            assert!(r.similarity.is_none());
        }
    }

    #[test]
    fn bracketed_chunk_falls_between_its_neighbors() {
        let anchors = vec![anchor(0, 0, 10), anchor(4, 90, 100)];
        let unmatched = vec![chunk(2)];
        let target = "x".repeat(100);
        let results = run(unmatched, &anchors, &target, 5).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].start_offset >= 10);
        assert!(results[0].end_offset <= 90);
        assert!(results[0].start_offset <= results[0].end_offset);
    }

    #[test]
    fn trailing_chunk_extends_past_the_last_anchor() {
        let anchors = vec![anchor(0, 0, 10)];
        let unmatched = vec![chunk(1), chunk(2)];
        let target = "x".repeat(100);
        let results = run(unmatched, &anchors, &target, 3).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].start_offset >= 10);
        assert!(results[1].start_offset >= results[0].start_offset);
        assert!(results[1].end_offset <= 100);
    }

    #[test]
    fn leading_chunk_sits_before_the_first_anchor() {
        let anchors = vec![anchor(2, 50, 60)];
        let unmatched = vec![chunk(0), chunk(1)];
        let target = "x".repeat(100);
        let results = run(unmatched, &anchors, &target, 3).unwrap();
        assert_eq!(results.len(), 2);
        for r in &results {
            assert!(r.end_offset <= 50);
        }
    }

    #[test]
    fn every_result_stays_within_target_bounds() {
        let anchors = vec![anchor(5, 480, 500)];
        let unmatched: Vec<SourceChunk> = (0..5).map(chunk).collect();
        let target = "x".repeat(500);
        let results = run(unmatched, &anchors, &target, 6).unwrap();
        for r in &results {
            assert!(r.end_offset <= 500);
            assert!(r.start_offset <= r.end_offset);
        }
    }

    #[test]
    fn interpolated_spans_never_split_a_multibyte_char() {
        // Every other char is a 3-byte snowman; an interpolated span computed
        // by pure byte arithmetic would land mid-character almost everywhere
        // if it weren't snapped to a real boundary.
        let target: String = (0..60)
            .map(|i| if i % 2 == 0 { '\u{2603}' } else { 'x' })
            .collect();
        let anchors = vec![anchor(0, 0, 4), anchor(9, target.len() - 4, target.len())];
        let unmatched: Vec<SourceChunk> = (1..9).map(chunk).collect();
        let results = run(unmatched, &anchors, &target, 10).unwrap();
        for r in &results {
            assert!(target.is_char_boundary(r.start_offset));
            assert!(target.is_char_boundary(r.end_offset));
            assert!(r.start_offset <= r.end_offset);
        }
    }
}
