//! Reanchor - Bulletproof Chunk Re-Anchoring Engine CLI
//!
//! Reanchor re-anchors pre-cleanup document chunks (extracted from a
//! PDF/EPUB by an external converter) onto the byte offsets of a
//! post-cleanup, LLM-cleaned target text, through a four-layer cascade:
//! fuzzy matching, embedding window scan, LLM position query, and
//! deterministic interpolation. Every input chunk receives a result.

use clap::{Parser, Subcommand};
use reanchor_core::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "reanchor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bulletproof chunk re-anchoring engine for document-processing pipelines")]
#[command(long_about = r#"
Reanchor takes pre-cleanup document chunks with structural metadata and
re-anchors them onto the character offsets of a post-cleanup target text,
without access to the original extraction offsets.

The four-layer cascade tries, in order: exact/normalized/anchor/sliding-window
fuzzy matching, an embedding window scan, an LLM position query, and finally
deterministic interpolation, which never fails. Every chunk gets a result.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, pretty, compact)
    #[arg(short, long, default_value = "pretty", global = true)]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-anchor source chunks onto a target text
    Match(reanchor_cli::MatchCommand),

    /// Write a default matcher configuration file
    Init(reanchor_cli::InitCommand),

    /// Validate a matcher configuration file
    Validate(reanchor_cli::ValidateCommand),

    /// Show version information
    Version,

    /// Show health status
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let log_format = if cli.output == "json" { "json" } else { "pretty" };
    reanchor_core::init_logging_with_config(log_level, log_format)?;

    info!("Starting reanchor v{}", env!("CARGO_PKG_VERSION"));

    let exit_code = match cli.command {
        Some(Commands::Match(args)) => run(args).await,
        Some(Commands::Init(args)) => run(args).await,
        Some(Commands::Validate(args)) => run(args).await,
        Some(Commands::Version) => {
            println!("{}", reanchor_core::version_info());
            0
        }
        Some(Commands::Health) => match reanchor_core::health_check() {
            Ok(()) => {
                println!("healthy");
                0
            }
            Err(msg) => {
                eprintln!("unhealthy: {msg}");
                1
            }
        },
        None => {
            println!("No command specified. Run 'reanchor --help' for usage.");
            0
        }
    };

    if exit_code == 0 {
        info!("reanchor completed successfully");
        Ok(())
    } else {
        std::process::exit(exit_code);
    }
}

async fn run<T: reanchor_cli::CliCommand>(args: T) -> i32 {
    match reanchor_cli::execute_command(args).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            reanchor_cli::exit_code_for_error(&e)
        }
    }
}
