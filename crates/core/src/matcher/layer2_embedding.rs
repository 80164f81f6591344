//! Layer 2 — embedding window scan.
//!
//! Runs only when an `Embedder` port is present. Batch-embeds the remaining
//! unmatched chunks and a set of overlapping windows cut from the target,
//! then picks each chunk's best-scoring window by cosine similarity.

use super::ports::{Embedder, MatcherPorts};
use super::similarity::cosine_similarity;
use super::types::{Confidence, MatchMethod, MatchResult, SourceChunk};
use crate::config::{EmbeddingScanConfig, ThresholdConfig};
use crate::error::{Result, XzeError};

struct Window {
    start: usize,
    end: usize,
    text: String,
}

/// Cut the target into overlapping, index-sorted windows.
///
/// Window length is the mean char length of the unmatched chunks; stride is
/// 50% of the window length, widened if needed to keep the window count at
/// or below `scan_config.max_windows`.
fn build_windows(target: &str, window_len_chars: usize, scan_config: &EmbeddingScanConfig) -> Vec<Window> {
    if window_len_chars == 0 || target.is_empty() {
        return Vec::new();
    }

    let mut boundaries: Vec<usize> = target.char_indices().map(|(i, _)| i).collect();
    boundaries.push(target.len());
    let total_chars = boundaries.len() - 1;

    if total_chars == 0 {
        return Vec::new();
    }

    let window_len_chars = window_len_chars.min(total_chars).max(1);
    let mut stride = ((window_len_chars as f32) * (1.0 - scan_config.window_overlap))
        .round()
        .max(1.0) as usize;

    let naive_count = total_chars.div_ceil(stride).max(1);
    if naive_count > scan_config.max_windows {
        let needed_stride = total_chars.div_ceil(scan_config.max_windows).max(1);
        stride = stride.max(needed_stride);
    }

    let mut windows = Vec::new();
    let mut start_char = 0;
    loop {
        let end_char = (start_char + window_len_chars).min(total_chars);
        let start_byte = boundaries[start_char];
        let end_byte = boundaries[end_char];
        windows.push(Window {
            start: start_byte,
            end: end_byte,
            text: target[start_byte..end_byte].to_string(),
        });

        if end_char >= total_chars {
            break;
        }
        start_char += stride;
        if windows.len() >= scan_config.max_windows {
            break;
        }
    }

    windows
}

/// Run Layer 2 over the chunks Layer 1 could not place.
pub async fn run(
    chunks: Vec<SourceChunk>,
    target: &str,
    ports: &MatcherPorts<'_>,
    thresholds: &ThresholdConfig,
    scan_config: &EmbeddingScanConfig,
) -> Result<(Vec<MatchResult>, Vec<SourceChunk>)> {
    let Some(embedder) = ports.embedder else {
        return Ok((Vec::new(), chunks));
    };

    if chunks.is_empty() {
        return Ok((Vec::new(), chunks));
    }

    let mean_len_chars = {
        let total: usize = chunks.iter().map(|c| c.content.chars().count()).sum();
        (total / chunks.len()).max(1)
    };

    let windows = build_windows(target, mean_len_chars, scan_config);
    if windows.is_empty() {
        return Ok((Vec::new(), chunks));
    }

    let chunk_texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let chunk_embeddings = match embed_all(embedder, &chunk_texts).await {
        Ok(embeddings) => embeddings,
        Err(e) => {
            tracing::warn!("Layer 2 embedder failed on chunk batch: {}", e);
            return Ok((Vec::new(), chunks));
        }
    };

    let window_texts: Vec<String> = windows.iter().map(|w| w.text.clone()).collect();
    let window_embeddings = match embed_all(embedder, &window_texts).await {
        Ok(embeddings) => embeddings,
        Err(e) => {
            tracing::warn!("Layer 2 embedder failed on window batch: {}", e);
            return Ok((Vec::new(), chunks));
        }
    };

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for (chunk, chunk_embedding) in chunks.into_iter().zip(chunk_embeddings.iter()) {
        if ports.is_cancelled() {
            unmatched.push(chunk);
            continue;
        }

        let mut best: Option<(usize, f32)> = None;
        for (idx, window_embedding) in window_embeddings.iter().enumerate() {
            let sim = cosine_similarity(chunk_embedding, window_embedding);
            match best {
                Some((_, best_sim)) if best_sim >= sim => {}
                _ => best = Some((idx, sim)),
            }
        }

        match best {
            Some((idx, sim)) if sim >= thresholds.embedding_medium => {
                let window = &windows[idx];
                let confidence = if sim >= thresholds.embedding_high {
                    Confidence::High
                } else {
                    Confidence::Medium
                };
                matched.push(MatchResult {
                    chunk,
                    start_offset: window.start.min(target.len()),
                    end_offset: window.end.min(target.len()),
                    confidence,
                    method: MatchMethod::EmbeddingMatch,
                    similarity: Some(sim),
                });
            }
            _ => unmatched.push(chunk),
        }
    }

    Ok((matched, unmatched))
}

async fn embed_all(embedder: &dyn Embedder, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let embeddings = embedder.embed(texts).await?;
    if embeddings.len() != texts.len() {
        return Err(XzeError::service_failure(format!(
            "embedder returned {} vectors for {} inputs",
            embeddings.len(),
            texts.len()
        )));
    }
    Ok(embeddings)
}
