//! Layer 3 — LLM position query.
//!
//! Runs only when an `LlmClient` port is present. Per chunk, asks the model
//! for the chunk's offsets inside a bounded window centered on the chunk's
//! estimated position, derived purely from its index and the target length.

use super::ports::MatcherPorts;
use super::types::{Confidence, MatchMethod, MatchResult, SourceChunk};
use crate::config::{LlmQueryConfig, ThresholdConfig};
use crate::error::Result;

/// Run Layer 3 over the chunks Layer 1 and Layer 2 could not place.
///
/// `total_chunks` is the original `N`, used to estimate each chunk's
/// fractional position in the target even though some chunks have already
/// been removed from `chunks` by earlier layers.
pub async fn run(
    chunks: Vec<SourceChunk>,
    target: &str,
    total_chunks: usize,
    ports: &MatcherPorts<'_>,
    thresholds: &ThresholdConfig,
    llm_config: &LlmQueryConfig,
) -> Result<(Vec<MatchResult>, Vec<SourceChunk>)> {
    let Some(llm_client) = ports.llm_client else {
        return Ok((Vec::new(), chunks));
    };

    if chunks.is_empty() || target.is_empty() || total_chunks == 0 {
        return Ok((Vec::new(), chunks));
    }

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for chunk in chunks {
        if ports.is_cancelled() {
            unmatched.push(chunk);
            continue;
        }

        let (window_start, window_text) =
            window_for_chunk(chunk.index, total_chunks, target, llm_config.window_radius_chars);

        if window_text.is_empty() {
            unmatched.push(chunk);
            continue;
        }

        match llm_client.find_position(&chunk.content, &window_text).await {
            Ok(position) if position.found && position.start_offset < position.end_offset => {
                let rel_start = position.start_offset;
                let rel_end = position.end_offset;

                if rel_end > window_text.len()
                    || !window_text.is_char_boundary(rel_start)
                    || !window_text.is_char_boundary(rel_end)
                {
                    tracing::warn!(
                        chunk_index = chunk.index,
                        "Layer 3 LLM returned out-of-bounds offsets; leaving chunk unmatched"
                    );
                    unmatched.push(chunk);
                    continue;
                }

                let abs_start = window_start + rel_start;
                let abs_end = window_start + rel_end;

                if abs_end > target.len()
                    || !target.is_char_boundary(abs_start)
                    || !target.is_char_boundary(abs_end)
                {
                    unmatched.push(chunk);
                    continue;
                }

                matched.push(MatchResult {
                    chunk,
                    start_offset: abs_start,
                    end_offset: abs_end,
                    confidence: Confidence::Medium,
                    method: MatchMethod::LlmMatch,
                    similarity: Some(thresholds.llm_confidence_floor),
                });
            }
            Ok(_) => unmatched.push(chunk),
            Err(e) => {
                tracing::warn!(
                    chunk_index = chunk.index,
                    error = %e,
                    "Layer 3 LLM call failed; leaving chunk unmatched"
                );
                unmatched.push(chunk);
            }
        }
    }

    Ok((matched, unmatched))
}

/// Compute the `±radius` char window around a chunk's estimated position,
/// clamped to char boundaries and target bounds.
fn window_for_chunk(
    index: usize,
    total_chunks: usize,
    target: &str,
    radius_chars: usize,
) -> (usize, String) {
    let estimated_byte = ((index as f64 / total_chunks as f64) * target.len() as f64) as usize;
    let estimated_byte = estimated_byte.min(target.len());

    let mut boundaries: Vec<usize> = target.char_indices().map(|(i, _)| i).collect();
    boundaries.push(target.len());
    let center_byte = nearest_char_boundary(&boundaries, estimated_byte);

    let center_char_idx = boundaries.iter().position(|&b| b == center_byte).unwrap_or(0);
    let total_chars = boundaries.len() - 1;

    let start_char = center_char_idx.saturating_sub(radius_chars);
    let end_char = (center_char_idx + radius_chars).min(total_chars);

    let start_byte = boundaries[start_char];
    let end_byte = boundaries[end_char];

    (start_byte, target[start_byte..end_byte].to_string())
}

fn nearest_char_boundary(boundaries: &[usize], byte_offset: usize) -> usize {
    match boundaries.binary_search(&byte_offset) {
        Ok(idx) => boundaries[idx],
        Err(idx) => boundaries[idx.min(boundaries.len() - 1)],
    }
}
