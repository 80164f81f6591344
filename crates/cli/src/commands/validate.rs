//! Validate command implementation

use clap::Args;
use reanchor_core::{config::MatcherConfig, Result};
use std::path::PathBuf;

use crate::commands::CliCommand;

/// Validate a matcher configuration file
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    #[arg(short, long)]
    pub config: PathBuf,
}

impl CliCommand for ValidateCommand {
    async fn execute(&self) -> Result<()> {
        let config = MatcherConfig::from_file(&self.config)?;
        config.validate()?;

        println!("{} is valid", self.config.display());
        println!("  ollama.url:           {}", config.ollama.url);
        println!("  ollama.models.embedding: {}", config.ollama.models.embedding);
        println!("  ollama.models.llm:    {}", config.ollama.models.llm);
        println!(
            "  thresholds.normalized: {}",
            config.thresholds.normalized
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "validate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_accepts_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("reanchor.yaml");
        MatcherConfig::default().to_file(&config_path).unwrap();

        let cmd = ValidateCommand {
            config: config_path,
        };
        assert!(cmd.execute().await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_rejects_broken_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("reanchor.yaml");
        let mut config = MatcherConfig::default();
        config.thresholds.sliding_window_high = 0.1;
        config.thresholds.sliding_window_min = 0.9;
        config.to_file(&config_path).unwrap();

        let cmd = ValidateCommand {
            config: config_path,
        };
        assert!(cmd.execute().await.is_err());
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let cmd = ValidateCommand {
            config: PathBuf::from("/nonexistent/reanchor.yaml"),
        };
        assert!(cmd.execute().await.is_err());
    }
}
