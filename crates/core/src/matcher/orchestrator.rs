//! The cascade orchestrator: `bulletproof_match`.

use super::layer1_fuzzy;
use super::layer2_embedding;
use super::layer3_llm;
use super::layer4_interpolation;
use super::ports::MatcherPorts;
use super::types::{MatchOutcome, MatchResult, MatchStats, SourceChunk, Warning};
use crate::config::ThresholdConfig;
use crate::error::{Result, XzeError};

/// Re-anchor every `chunk` onto a byte offset span in `target`, guaranteeing
/// that every chunk receives exactly one `MatchResult` even if the cascade
/// has to fall back to deterministic interpolation for some of them.
pub async fn bulletproof_match(
    target: &str,
    chunks: Vec<SourceChunk>,
    ports: MatcherPorts<'_>,
    config: &ThresholdConfig,
) -> Result<MatchOutcome> {
    let total = chunks.len();
    if total == 0 {
        return Ok(MatchOutcome::empty());
    }

    ports.report(0, "layer1", "starting fuzzy matching");

    let (mut matched, unmatched) = layer1_fuzzy::run(chunks, target, config);
    tracing::info!(
        matched = matched.len(),
        remaining = unmatched.len(),
        "Layer 1 complete"
    );
    ports.report(30, "layer1", "fuzzy matching complete");

    let unmatched = if !unmatched.is_empty() && ports.embedder.is_some() {
        ports.report(30, "layer2", "starting embedding window scan");
        let scan_config = crate::config::EmbeddingScanConfig::default();
        let (layer2_matched, layer2_unmatched) =
            match layer2_embedding::run(unmatched, target, &ports, config, &scan_config).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Layer 2 failed: {}", e);
                    return Err(e);
                }
            };
        tracing::info!(
            matched = layer2_matched.len(),
            remaining = layer2_unmatched.len(),
            "Layer 2 complete"
        );
        matched.extend(layer2_matched);
        ports.report(70, "layer2", "embedding window scan complete");
        layer2_unmatched
    } else {
        unmatched
    };

    let unmatched = if !unmatched.is_empty() && ports.llm_client.is_some() {
        ports.report(70, "layer3", "starting LLM position query");
        let llm_config = crate::config::LlmQueryConfig::default();
        let (layer3_matched, layer3_unmatched) =
            match layer3_llm::run(unmatched, target, total, &ports, config, &llm_config).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Layer 3 failed: {}", e);
                    return Err(e);
                }
            };
        tracing::info!(
            matched = layer3_matched.len(),
            remaining = layer3_unmatched.len(),
            "Layer 3 complete"
        );
        matched.extend(layer3_matched);
        ports.report(90, "layer3", "LLM position query complete");
        layer3_unmatched
    } else {
        unmatched
    };

    if !unmatched.is_empty() {
        ports.report(90, "layer4", "interpolating remaining chunks");
        let synthetic = layer4_interpolation::run(unmatched, &matched, target, total)?;
        matched.extend(synthetic);
    }

    matched.sort_by_key(|r| r.chunk.index);

    if matched.len() != total {
        return Err(XzeError::internal_invariant_violation(format!(
            "expected {total} matched results, got {}",
            matched.len()
        )));
    }

    let cancelled = ports.is_cancelled();
    let stats = MatchStats::from_results(&matched, cancelled);
    let warnings = collect_warnings(&matched);

    ports.report(100, "done", "cascade complete");

    Ok(MatchOutcome {
        results: matched,
        stats,
        warnings,
    })
}

fn collect_warnings(results: &[MatchResult]) -> Vec<Warning> {
    results
        .iter()
        .filter(|r| r.confidence == super::types::Confidence::Synthetic)
        .map(|r| {
            let pages = match (r.chunk.meta.page_start, r.chunk.meta.page_end) {
                (Some(start), Some(end)) if start != end => format!(" (pages {start}-{end})"),
                (Some(start), _) => format!(" (page {start})"),
                _ => String::new(),
            };
            format!(
                "chunk {} recovered only via interpolation{}",
                r.chunk.index, pages
            )
        })
        .collect()
}
