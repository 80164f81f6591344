//! Reanchor CLI Library
//!
//! Command-line interface components for the bulletproof chunk re-anchoring engine.

use reanchor_core::{Result, XzeError};

pub mod commands;
pub mod config;
pub mod output;

pub use commands::*;
pub use config::*;
pub use output::*;

/// CLI version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the CLI environment
pub fn init() -> Result<()> {
    // Set up panic handler
    std::panic::set_hook(Box::new(|info| {
        eprintln!("reanchor encountered an error: {}", info);
    }));

    Ok(())
}

/// Check if running in CI environment
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Get the appropriate exit code for an error
pub fn exit_code_for_error(error: &XzeError) -> i32 {
    match error {
        XzeError::Validation { .. } => 2,
        XzeError::NotFound { .. } => 3,
        XzeError::Network { .. } => 5,
        XzeError::AiService { .. } => 6,
        XzeError::InvalidInput { .. } => 7,
        XzeError::ServiceFailure { .. } => 8,
        XzeError::Timeout { .. } => 9,
        XzeError::ModelNotAvailable { .. } => 10,
        XzeError::Cancelled => 11,
        XzeError::InternalInvariantViolation { .. } => 70, // EX_SOFTWARE
        _ => 1,
    }
}
