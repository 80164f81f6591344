//! Init command implementation

use clap::Args;
use reanchor_core::{config::MatcherConfig, Result, XzeError};
use std::path::PathBuf;

use crate::commands::CliCommand;

/// Write a default matcher configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Configuration file path to write
    #[arg(short, long, default_value = "reanchor.yaml")]
    pub config: PathBuf,

    /// Force initialization even if the file already exists
    #[arg(short, long)]
    pub force: bool,

    /// Ollama server URL to seed into the config
    #[arg(long, default_value = "http://localhost:11434")]
    pub ollama_url: String,
}

impl CliCommand for InitCommand {
    async fn execute(&self) -> Result<()> {
        if self.config.exists() && !self.force {
            println!(
                "Configuration file already exists at: {}",
                self.config.display()
            );
            println!("Use --force to overwrite.");
            return Ok(());
        }

        let mut config = MatcherConfig::default();
        config.ollama.url = self.ollama_url.clone();
        config.validate()?;
        config.to_file(&self.config)?;

        println!("Configuration written to: {}", self.config.display());
        println!("Edit thresholds, model names, or the Ollama URL before running 'reanchor match'.");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "init"
    }

    fn validate(&self) -> Result<()> {
        if !self.ollama_url.starts_with("http://") && !self.ollama_url.starts_with("https://") {
            return Err(XzeError::validation("Ollama URL must use http or https scheme"));
        }
        Ok(())
    }
}
