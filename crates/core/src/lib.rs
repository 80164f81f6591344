//! Reanchor Core Library
//!
//! Bulletproof chunk re-anchoring: given pre-cleanup document chunks with
//! rich structural metadata (page numbers, heading paths, bounding boxes)
//! and a post-cleanup LLM-cleaned text, recover the exact position of every
//! chunk in the cleaned text through a four-layer cascade: fuzzy matching,
//! embedding window scan, LLM position query, and deterministic
//! interpolation. The cascade guarantees 100% chunk recovery — every input
//! chunk receives a `MatchResult`, even if only a synthetic, interpolated one.

pub mod ai;
pub mod config;
pub mod error;
pub mod matcher;
pub mod semantic;

// Re-export commonly used types
pub use config::MatcherConfig;
pub use error::{Result, XzeError};
pub use matcher::{
    bulletproof_match, BoundingBox, ChunkMeta, Confidence, MatchMethod, MatchOutcome,
    MatchResult, MatchStats, SourceChunk, Warning,
};

/// Initialize logging with JSON formatting
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reanchor_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    Ok(())
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::new(level);

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "text" | "pretty" => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
        "compact" => {
            registry
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            return Err(XzeError::validation(format!(
                "Unknown log format: {}",
                format
            )));
        }
    }

    Ok(())
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}

/// Health check function
pub fn health_check() -> std::result::Result<(), String> {
    // Basic health checks
    if std::env::var("HOME").is_err() && std::env::var("USERPROFILE").is_err() {
        return Err("No home directory found".to_string());
    }

    // Check if we can create temporary files
    if let Err(e) = tempfile::tempfile() {
        return Err(format!("Cannot create temporary files: {}", e));
    }

    Ok(())
}
