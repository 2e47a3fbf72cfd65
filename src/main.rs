//! kolosal-prep - Main Entry Point
//!
//! Cleans delimited data files from the command line.

use clap::Parser;
use kolosal_prep::cli::{build_config, cmd_clean, cmd_info, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_prep=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { data, output, config, constant_column, skip_all_missing, report } => {
            let config = build_config(config.as_deref(), constant_column.as_deref(), skip_all_missing)?;
            cmd_clean(&data, &output, config, report)?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
    }

    Ok(())
}
