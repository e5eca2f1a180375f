// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use repoinit_sysusers::ConverterConfig;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the script
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = ConverterConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Convert {
            packages,
            output,
            format,
        } => commands::cmd_convert(&config, &packages, output.as_deref(), format),
        Commands::Classify { paths } => commands::cmd_classify(&config, &paths),
        Commands::Decode { segments } => commands::cmd_decode(&segments),
        Commands::Encode { names } => commands::cmd_encode(&names),
        Commands::Check { script } => commands::cmd_check(&script),
    }
}
