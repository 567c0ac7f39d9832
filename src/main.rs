//! Kolosal kNN - Main Entry Point
//!
//! Cross-validates a mixed-type KNN classifier over delimited data files.

use clap::Parser;
use kolosal_knn::cli::{cmd_classify, cmd_evaluate, cmd_info, cmd_time, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_knn=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate { args, json } => {
            cmd_evaluate(&args, json)?;
        }
        Commands::Classify { args, query } => {
            cmd_classify(&args, &query)?;
        }
        Commands::Time { args, iterations } => {
            cmd_time(&args, iterations)?;
        }
        Commands::Info { args } => {
            cmd_info(&args)?;
        }
    }

    Ok(())
}
